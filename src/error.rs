//! Crate-wide error type.
//!
//! Inference-side failures (`MissingFeature`, `UnknownCategory`) are
//! recoverable at the session boundary: the session keeps its state so the
//! caller can correct the offending answer and resubmit. Artifact and
//! rendering failures are surfaced to the immediate caller and never retried
//! automatically.

use std::path::PathBuf;
use thiserror::Error;

/// All failure modes of the screening tool.
#[derive(Debug, Error)]
pub enum Error {
    /// A required schema field has no answer. Raised before the model is
    /// invoked.
    #[error("missing answer for required feature `{0}`")]
    MissingFeature(String),

    /// A categorical answer is outside its encoder's fitted vocabulary.
    #[error("value `{value}` for feature `{feature}` is not in the fitted vocabulary")]
    UnknownCategory { feature: String, value: String },

    /// A serialized model or encoder bundle is missing or corrupt. Fatal at
    /// startup; the process cannot serve predictions without the artifacts.
    #[error("failed to load artifact `{path}`: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    /// The PDF rendering surface could not complete. Fatal for the single
    /// report; session state is unaffected and generation may be retried.
    #[error("report rendering failed: {0}")]
    Render(String),

    /// A malformed training dataset row. Training is an offline, operator
    /// supervised step, so this aborts the run.
    #[error("malformed dataset row: {0}")]
    Dataset(String),

    /// An answer whose shape does not match its field's domain, e.g. a
    /// non-numeric age.
    #[error("answer for `{feature}` must be numeric, got `{value}`")]
    InvalidAnswer { feature: String, value: String },

    /// A session event fired in a state that does not accept it.
    #[error("invalid session transition: `{event}` in state `{state}`")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    /// The subject name is empty. Blocks all transitions past `Idle`.
    #[error("a subject name is required before answering questions")]
    MissingName,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an `ArtifactLoad` from any underlying cause.
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
