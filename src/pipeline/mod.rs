//! The offline training pipeline.
//!
//! Turns the labeled survey CSV into the two artifacts the screening app
//! loads at startup: the fitted preprocessing + logistic regression pipeline
//! and the categorical encoder bundle.
//!
//! ## Pipeline
//!
//! 1. Load and clean the survey (`dataset`): drop bookkeeping columns,
//!    rows without a `treatment` label, and implausible ages.
//! 2. Fit one categorical encoder per survey column plus the target encoder
//!    (`train::fit_encoders`).
//! 3. Deterministic seeded 80/20 split.
//! 4. Fit per-column preprocessing (impute + standardize / one-hot) and the
//!    logistic regression (`model`).
//! 5. Report accuracy, confusion matrix, classification report and k-fold
//!    cross-validation (`evaluate`).
//! 6. Persist `mental_health_model.json` and `label_encoders.json`.
//!
//! ## Module Structure
//!
//! - [`config`] - Configuration structures and loading
//! - [`dataset`] - Survey CSV loading and cleaning
//! - [`model`] - Preprocessing stages and the classifier
//! - [`train`] - Training orchestration
//! - [`evaluate`] - Metrics and cross-validation

pub mod config;
pub mod dataset;
pub mod evaluate;
pub mod model;
pub mod train;

pub use config::Config;
pub use model::ModelPipeline;
pub use train::train_model;
