//! Configuration structures for the training pipeline.
//!
//! Strongly-typed configuration loaded from a TOML file, covering the
//! dataset path, split parameters, classifier hyperparameters and artifact
//! output paths.

use serde::Deserialize;
use std::error::Error;

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Data loading configuration
    pub data: DataConfig,
    /// Classifier hyperparameters
    pub model: ModelConfig,
    /// Training / evaluation parameters
    pub training: TrainingConfig,
    /// Artifact output paths
    pub output: OutputConfig,
}

/// Data loading configuration.
#[derive(Debug, Deserialize)]
pub struct DataConfig {
    /// Path to the survey CSV dataset file
    pub csv_path: String,
    /// Train/test split ratio (e.g., 0.8 = 80% train, 20% test)
    pub train_split: f64,
}

/// Logistic regression hyperparameters.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Gradient descent learning rate
    pub learning_rate: f64,
    /// L2 regularization strength
    pub l2_penalty: f64,
    /// Iteration cap for the gradient descent fit
    pub max_iter: usize,
}

/// Training / evaluation parameters.
#[derive(Debug, Deserialize)]
pub struct TrainingConfig {
    /// Seed for the deterministic train/test shuffle
    pub seed: u64,
    /// Number of cross-validation folds
    pub cv_folds: usize,
}

/// Artifact output paths.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory to save artifacts
    pub model_dir: String,
    /// Fitted pipeline filename
    pub model_file: String,
    /// Encoder bundle filename
    pub encoders_file: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    /// Default configuration used when `config.toml` is not available.
    fn default() -> Self {
        Config {
            data: DataConfig {
                csv_path: "data/survey.csv".to_string(),
                train_split: 0.8,
            },
            model: ModelConfig {
                learning_rate: 0.1,
                l2_penalty: 1e-3,
                max_iter: 1000,
            },
            training: TrainingConfig {
                seed: 42,
                cv_folds: 5,
            },
            output: OutputConfig {
                model_dir: "models".to_string(),
                model_file: "mental_health_model.json".to_string(),
                encoders_file: "label_encoders.json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_artifact_layout() {
        let config = Config::default();
        assert_eq!(config.data.train_split, 0.8);
        assert_eq!(config.model.max_iter, 1000);
        assert_eq!(config.training.cv_folds, 5);
        assert_eq!(config.output.model_file, "mental_health_model.json");
    }

    #[test]
    fn config_parses_from_toml() {
        let toml_src = r#"
            [data]
            csv_path = "data/survey.csv"
            train_split = 0.75

            [model]
            learning_rate = 0.05
            l2_penalty = 0.001
            max_iter = 500

            [training]
            seed = 7
            cv_folds = 3

            [output]
            model_dir = "out"
            model_file = "model.json"
            encoders_file = "encoders.json"
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.data.train_split, 0.75);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.output.model_dir, "out");
    }
}
