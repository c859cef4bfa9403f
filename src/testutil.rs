//! Shared fixtures for unit tests: a synthetic survey covering every
//! declared option, and a predictor fitted over it.

use crate::inference::{AnswerSet, Predictor};
use crate::pipeline::config::Config;
use crate::pipeline::dataset::{read_survey, SurveyDataset};
use crate::pipeline::model::ModelPipeline;
use crate::pipeline::train::{categorical_mask, encode_dataset, fit_encoders};
use crate::schema::{Domain, FEATURES, TARGET};
use std::io::Cursor;

/// A synthetic cleaned survey with `rows` rows. Options cycle per column so
/// any row count >= 6 observes every declared option; target labels
/// alternate Yes/No.
pub fn synthetic_survey(rows: usize) -> SurveyDataset {
    let mut header: Vec<&str> = FEATURES.iter().map(|f| f.name).collect();
    header.push(TARGET);
    let mut csv = format!("{}\n", header.join(","));
    for i in 0..rows {
        let mut cells = vec![format!("{}", 20 + (i % 40))];
        for field in &FEATURES[1..] {
            if let Domain::Choice(options) = field.domain {
                cells.push(options[i % options.len()].to_string());
            }
        }
        cells.push(if i % 2 == 0 { "Yes" } else { "No" }.to_string());
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    read_survey(Cursor::new(csv)).unwrap()
}

/// A real predictor fitted over the synthetic survey.
pub fn fixture_predictor() -> Predictor {
    let dataset = synthetic_survey(24);
    let encoders = fit_encoders(&dataset);
    let (x, y) = encode_dataset(&dataset, &encoders).unwrap();
    let model = ModelPipeline::fit(&x, &categorical_mask(), &y, &Config::default().model);
    Predictor::from_parts(model, encoders).unwrap()
}

/// A complete answer set: age 29 and the first listed option of every
/// categorical field.
pub fn valid_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    for field in FEATURES {
        match field.domain {
            Domain::Range { .. } => answers.set_number(field.name, 29.0),
            Domain::Choice(options) => answers.set_choice(field.name, options[0]),
        }
    }
    answers
}
