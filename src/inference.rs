//! Inference over the persisted artifacts.
//!
//! [`Predictor`] loads the fitted pipeline and encoder bundle once and then
//! serves predictions for raw answer sets. Prediction is pure: the loaded
//! artifacts are immutable, every validation failure is reported before the
//! model is invoked, and a failed call leaves nothing half-done.
//!
//! The human-readable label always comes from the target encoder's inverse
//! mapping. There is deliberately no hardcoded class-to-label fallback: a
//! bundle without a target encoder is rejected at load time, so the single
//! source of truth for label wording is the artifact itself.

use crate::encoder::EncoderBundle;
use crate::error::{Error, Result};
use crate::pipeline::model::ModelPipeline;
use crate::schema::FEATURES;
use std::collections::HashMap;
use std::path::Path;

/// One raw user-supplied survey answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Number(f64),
    Choice(String),
}

impl Answer {
    fn as_text(&self) -> String {
        match self {
            Answer::Number(n) => n.to_string(),
            Answer::Choice(s) => s.clone(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            Answer::Choice(s) => s.trim().parse().ok(),
        }
    }
}

/// Feature name -> raw answer, one entry per schema field. Ephemeral: built
/// fresh for each screening session and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnswerSet {
    answers: HashMap<String, Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: impl Into<String>, answer: Answer) {
        self.answers.insert(feature.into(), answer);
    }

    pub fn set_number(&mut self, feature: impl Into<String>, value: f64) {
        self.set(feature, Answer::Number(value));
    }

    pub fn set_choice(&mut self, feature: impl Into<String>, value: impl Into<String>) {
        self.set(feature, Answer::Choice(value.into()));
    }

    pub fn get(&self, feature: &str) -> Option<&Answer> {
        self.answers.get(feature)
    }

    pub fn remove(&mut self, feature: &str) -> Option<Answer> {
        self.answers.remove(feature)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// `(question, answer-text)` pairs in schema order, for the report.
    pub fn report_pairs(&self) -> Vec<(String, String)> {
        FEATURES
            .iter()
            .filter_map(|field| {
                self.answers
                    .get(field.name)
                    .map(|a| (field.question.to_string(), a.as_text()))
            })
            .collect()
    }
}

/// Outcome of a prediction: the raw class id and the label resolved through
/// the target encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub class_id: u32,
    pub label: String,
}

impl Prediction {
    /// Whether the outcome is the "needs support" class.
    pub fn needs_support(&self) -> bool {
        self.label == "Yes"
    }
}

/// Loads the two artifacts once and serves predictions. Immutable after
/// construction, so one instance can be shared freely.
pub struct Predictor {
    model: ModelPipeline,
    encoders: EncoderBundle,
}

impl Predictor {
    /// Load the fitted pipeline and encoder bundle from disk. Either file
    /// missing or corrupt is an [`Error::ArtifactLoad`]; so is a bundle
    /// without a target encoder.
    pub fn load(model_path: impl AsRef<Path>, encoders_path: impl AsRef<Path>) -> Result<Self> {
        let model = ModelPipeline::load(model_path)?;
        let encoders = EncoderBundle::load(encoders_path)?;
        Ok(Predictor { model, encoders })
    }

    /// Build a predictor from already-loaded artifacts.
    pub fn from_parts(model: ModelPipeline, encoders: EncoderBundle) -> Result<Self> {
        if encoders.target().is_none() {
            return Err(Error::artifact(
                "<in-memory bundle>",
                "bundle has no target encoder",
            ));
        }
        Ok(Predictor { model, encoders })
    }

    /// Predict the screening outcome for one answer set.
    ///
    /// Walks the schema in order, pushing each categorical answer through
    /// its encoder's forward mapping and each numeric answer through
    /// unchanged, then hands the assembled row to the pipeline's `predict`.
    pub fn predict(&self, answers: &AnswerSet) -> Result<Prediction> {
        let mut row = Vec::with_capacity(FEATURES.len());
        for field in FEATURES {
            let answer = answers
                .get(field.name)
                .ok_or_else(|| Error::MissingFeature(field.name.to_string()))?;

            if let Some(encoder) = self.encoders.get(field.name) {
                let value = answer.as_text();
                row.push(f64::from(encoder.encode(field.name, &value)?));
            } else {
                let value = answer.as_number().ok_or_else(|| Error::InvalidAnswer {
                    feature: field.name.to_string(),
                    value: answer.as_text(),
                })?;
                row.push(value);
            }
        }

        let class_id = self.model.predict(&row);
        let target = self
            .encoders
            .target()
            .expect("target encoder checked at construction");
        let label = target
            .decode(class_id)
            .ok_or_else(|| {
                Error::artifact(
                    "<target encoder>",
                    format!("class id {class_id} has no label"),
                )
            })?
            .to_string();

        Ok(Prediction { class_id, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Domain;
    use crate::testutil::{fixture_predictor as fixture, valid_answers};

    #[test]
    fn valid_answer_set_predicts_a_target_label() {
        let predictor = fixture();
        let prediction = predictor.predict(&valid_answers()).unwrap();
        assert!(prediction.class_id <= 1);
        assert!(prediction.label == "Yes" || prediction.label == "No");
        assert_eq!(prediction.needs_support(), prediction.label == "Yes");
    }

    #[test]
    fn every_declared_option_is_in_vocabulary() {
        // All declared options appear in the fixture's training data, so no
        // valid combination of answers can raise.
        let predictor = fixture();
        for field in FEATURES {
            if let Domain::Choice(options) = field.domain {
                for option in options {
                    let mut answers = valid_answers();
                    answers.set_choice(field.name, *option);
                    assert!(
                        predictor.predict(&answers).is_ok(),
                        "{}={option} should predict",
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn unknown_category_names_feature_and_value() {
        let predictor = fixture();
        let mut answers = valid_answers();
        answers.set_choice("remote_work", "Maybe");
        match predictor.predict(&answers).unwrap_err() {
            Error::UnknownCategory { feature, value } => {
                assert_eq!(feature, "remote_work");
                assert_eq!(value, "Maybe");
            }
            other => panic!("expected UnknownCategory, got {other}"),
        }
    }

    #[test]
    fn missing_feature_blocks_prediction() {
        let predictor = fixture();
        let mut answers = valid_answers();
        answers.remove("benefits");
        match predictor.predict(&answers).unwrap_err() {
            Error::MissingFeature(feature) => assert_eq!(feature, "benefits"),
            other => panic!("expected MissingFeature, got {other}"),
        }
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let predictor = fixture();
        let mut answers = valid_answers();
        answers.set_choice("Age", "twenty-nine");
        assert!(matches!(
            predictor.predict(&answers),
            Err(Error::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn report_pairs_follow_schema_order() {
        let answers = valid_answers();
        let pairs = answers.report_pairs();
        assert_eq!(pairs.len(), 23);
        assert_eq!(pairs[0].0, "What is your age?");
        assert_eq!(pairs[0].1, "29");
        assert_eq!(pairs[22].1, "United States");
    }
}
