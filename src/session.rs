//! The per-subject screening session state machine.
//!
//! One session covers a single end-to-end interaction: name entry, one
//! answer per schema field, a single prediction, and optional report
//! generation. Transitions are driven by named events rather than ambient
//! flags:
//!
//! ```text
//! Idle -> NameEntered -> AnswersCollected -> Predicted -> ReportAvailable
//!   ^                                                          |
//!   +------------------------- retake ------------------------+
//! ```
//!
//! A blank subject name blocks everything past `Idle`. `Predicted` is
//! entered at most once per session; a retake discards all collected state
//! and returns to `Idle`. Recoverable prediction failures (a missing or
//! out-of-vocabulary answer) leave the session where it was so the caller
//! can correct the answer and resubmit, and a report rendering failure
//! leaves the session in `Predicted` so generation can be retried without
//! re-answering anything.

use crate::error::{Error, Result};
use crate::inference::{Answer, AnswerSet, Prediction, Predictor};
use crate::report;
use crate::schema::FEATURES;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    NameEntered,
    AnswersCollected,
    Predicted,
    ReportAvailable,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::NameEntered => "NameEntered",
            SessionState::AnswersCollected => "AnswersCollected",
            SessionState::Predicted => "Predicted",
            SessionState::ReportAvailable => "ReportAvailable",
        }
    }
}

/// One subject's screening session.
#[derive(Debug, Default)]
pub struct ScreeningSession {
    state: Option<SessionStateData>,
}

#[derive(Debug)]
struct SessionStateData {
    state: SessionState,
    name: String,
    answers: AnswerSet,
    prediction: Option<Prediction>,
}

impl ScreeningSession {
    pub fn new() -> Self {
        ScreeningSession { state: None }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
            .as_ref()
            .map_or(SessionState::Idle, |s| s.state)
    }

    /// The prediction, once `submit` has succeeded.
    pub fn prediction(&self) -> Option<&Prediction> {
        self.state.as_ref().and_then(|s| s.prediction.as_ref())
    }

    /// Enter the subject's name. Blank names are rejected and the session
    /// stays in `Idle`.
    pub fn enter_name(&mut self, name: &str) -> Result<()> {
        if self.state() != SessionState::Idle {
            return Err(self.invalid("enter_name"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingName);
        }
        self.state = Some(SessionStateData {
            state: SessionState::NameEntered,
            name: name.to_string(),
            answers: AnswerSet::new(),
            prediction: None,
        });
        Ok(())
    }

    /// Record (or revise) one answer. Allowed while collecting answers and
    /// after collection, so an out-of-vocabulary answer can be corrected
    /// before resubmitting; once a prediction exists the questionnaire is
    /// frozen until a retake.
    pub fn record_answer(&mut self, feature: &str, answer: Answer) -> Result<()> {
        match self.state() {
            SessionState::NameEntered | SessionState::AnswersCollected => {}
            _ => return Err(self.invalid("record_answer")),
        }
        let data = self.state.as_mut().expect("state checked above");
        data.answers.set(feature, answer);
        if FEATURES.iter().all(|f| data.answers.get(f.name).is_some()) {
            data.state = SessionState::AnswersCollected;
        }
        Ok(())
    }

    /// Run the predictor over the collected answers. On success the session
    /// moves to `Predicted`; on a recoverable prediction failure it stays in
    /// `AnswersCollected` with the answers intact.
    pub fn submit(&mut self, predictor: &Predictor) -> Result<&Prediction> {
        if self.state() != SessionState::AnswersCollected {
            return Err(self.invalid("submit"));
        }
        let data = self.state.as_mut().expect("state checked above");
        let prediction = predictor.predict(&data.answers)?;
        data.prediction = Some(prediction);
        data.state = SessionState::Predicted;
        Ok(data.prediction.as_ref().expect("just stored"))
    }

    /// Render the PDF report for the prediction. Repeatable: the report can
    /// be regenerated while it stays available, and a rendering failure
    /// keeps the session in `Predicted` for a retry.
    pub fn generate_report(&mut self) -> Result<Vec<u8>> {
        match self.state() {
            SessionState::Predicted | SessionState::ReportAvailable => {}
            _ => return Err(self.invalid("generate_report")),
        }
        let data = self.state.as_mut().expect("state checked above");
        let prediction = data.prediction.as_ref().expect("predicted state");
        let age = data
            .answers
            .get("Age")
            .and_then(|a| match a {
                Answer::Number(n) => Some(*n as i64),
                Answer::Choice(s) => s.trim().parse().ok(),
            })
            .ok_or_else(|| Error::MissingFeature("Age".to_string()))?;

        let bytes = report::render(
            &data.name,
            age,
            &data.answers.report_pairs(),
            &prediction.label,
        )?;
        data.state = SessionState::ReportAvailable;
        Ok(bytes)
    }

    /// Suggested download filename for this session's report.
    pub fn report_filename(&self) -> Option<String> {
        self.state
            .as_ref()
            .map(|s| report::report_filename(&s.name))
    }

    /// Discard everything (answers, prediction, name) and return to `Idle`.
    pub fn retake(&mut self) {
        self.state = None;
    }

    fn invalid(&self, event: &'static str) -> Error {
        Error::InvalidTransition {
            state: self.state().name(),
            event,
        }
    }
}
