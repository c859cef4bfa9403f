//! # NeuroLens: Mental Health Screening
//!
//! A questionnaire-driven mental health screening tool. An offline training
//! pipeline fits per-column label encoders and a preprocessing + logistic
//! regression pipeline over a workplace mental health survey CSV, persisting
//! both as JSON artifacts. An inference layer loads those artifacts and
//! predicts whether a subject is likely to need mental health support from
//! their 23 questionnaire answers, and a screening session drives the whole
//! interaction from name entry through a downloadable PDF report.
//!
//! ## Components
//!
//! - **schema**: the fixed, ordered 23-field survey schema
//! - **encoder**: per-column label encoders and the persisted bundle
//! - **pipeline**: dataset loading, preprocessing, the classifier, metrics
//!   and the training orchestration
//! - **inference**: artifact loading and single-subject prediction
//! - **report**: paginated PDF report rendering
//! - **session**: the per-subject screening state machine
//! - **cli**: the `train` and `screen` commands

pub mod cli;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod session;

#[cfg(test)]
mod testutil;

pub use encoder::{CategoryEncoder, EncoderBundle};
pub use error::{Error, Result};
pub use inference::{Answer, AnswerSet, Prediction, Predictor};
pub use pipeline::config::Config;
pub use pipeline::model::ModelPipeline;
pub use schema::{Domain, Field, FEATURES, TARGET};
pub use session::{ScreeningSession, SessionState};
