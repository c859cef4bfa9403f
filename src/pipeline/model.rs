//! Preprocessing stages and the logistic regression classifier.
//!
//! The fitted pipeline mirrors the layout it was trained with: a per-column
//! preprocessing stage (mean-impute + standardize for numeric columns,
//! most-frequent-impute + one-hot for categorical code columns) feeding a
//! binary logistic regression. Once fitted the pipeline is immutable and
//! exposes a single `predict(row) -> class id` contract; callers never see
//! its internal representation.

use crate::error::{Error, Result};
use crate::pipeline::config::ModelConfig;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted preprocessing stage for one input column.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ColumnStage {
    /// Mean imputation followed by standardization.
    Numeric { mean: f64, std: f64 },
    /// Most-frequent imputation followed by one-hot encoding over the codes
    /// observed at fit time. Codes unseen at fit time map to the all-zeros
    /// block rather than erroring; the per-field encoders upstream are the
    /// strict gate for user input.
    Categorical { mode: u32, categories: Vec<u32> },
}

impl ColumnStage {
    fn output_width(&self) -> usize {
        match self {
            ColumnStage::Numeric { .. } => 1,
            ColumnStage::Categorical { categories, .. } => categories.len(),
        }
    }
}

/// Fitted per-column preprocessing for the full input row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    stages: Vec<ColumnStage>,
}

impl Preprocessor {
    /// Fit one stage per input column. `categorical[i]` selects the stage
    /// kind for column `i`; NaN cells are excluded from the fitted
    /// statistics and imputed at transform time.
    pub fn fit(x: &Array2<f64>, categorical: &[bool]) -> Self {
        let stages = categorical
            .iter()
            .enumerate()
            .map(|(col, &is_cat)| {
                let values: Vec<f64> = x.column(col).iter().copied().collect();
                if is_cat {
                    fit_categorical(&values)
                } else {
                    fit_numeric(&values)
                }
            })
            .collect();
        Preprocessor { stages }
    }

    /// Width of the transformed feature vector.
    pub fn output_dim(&self) -> usize {
        self.stages.iter().map(ColumnStage::output_width).sum()
    }

    /// Transform one input row into the classifier's feature space.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.output_dim());
        for (stage, &value) in self.stages.iter().zip(row) {
            match stage {
                ColumnStage::Numeric { mean, std } => {
                    let v = if value.is_nan() { *mean } else { value };
                    out.push((v - mean) / std);
                }
                ColumnStage::Categorical { mode, categories } => {
                    let code = if value.is_nan() { *mode } else { value as u32 };
                    for cat in categories {
                        out.push(if *cat == code { 1.0 } else { 0.0 });
                    }
                }
            }
        }
        out
    }

    /// Transform a full matrix, row by row.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let rows: Vec<f64> = x
            .rows()
            .into_iter()
            .flat_map(|r| self.transform_row(r.as_slice().expect("contiguous row")))
            .collect();
        Array2::from_shape_vec((x.nrows(), self.output_dim()), rows)
            .expect("row width matches output_dim")
    }
}

fn fit_numeric(values: &[f64]) -> ColumnStage {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = present.len().max(1) as f64;
    let mean = present.iter().sum::<f64>() / n;
    let mut std = (present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std < 1e-10 {
        std = 1.0; // constant column, avoid division by zero
    }
    ColumnStage::Numeric { mean, std }
}

fn fit_categorical(values: &[f64]) -> ColumnStage {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for v in values.iter().filter(|v| !v.is_nan()) {
        *counts.entry(*v as u32).or_insert(0) += 1;
    }
    let mut categories: Vec<u32> = counts.keys().copied().collect();
    categories.sort_unstable();
    // Ties resolve to the smallest code so refits are deterministic.
    let mode = categories
        .iter()
        .copied()
        .max_by_key(|c| (counts[c], std::cmp::Reverse(*c)))
        .unwrap_or(0);
    ColumnStage::Categorical { mode, categories }
}

/// Binary logistic regression fitted by full-batch gradient descent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Fit on a preprocessed design matrix and 0/1 class labels.
    pub fn fit(x: &Array2<f64>, y: &[u32], config: &ModelConfig) -> Self {
        let n = x.nrows() as f64;
        let targets: Array1<f64> = y.iter().map(|&c| c as f64).collect();
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..config.max_iter {
            let logits = x.dot(&weights) + bias;
            let errors = logits.mapv(sigmoid) - &targets;
            let grad_w = x.t().dot(&errors) / n + &(config.l2_penalty * &weights);
            let grad_b = errors.sum() / n;
            weights = weights - config.learning_rate * &grad_w;
            bias -= config.learning_rate * grad_b;
        }

        LogisticRegression { weights, bias }
    }

    /// Probability of the positive class for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, f)| w * f)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    /// Hard 0/1 class decision at the 0.5 threshold.
    pub fn predict(&self, features: &[f64]) -> u32 {
        u32::from(self.predict_proba(features) >= 0.5)
    }
}

/// The persisted preprocessing + classification pipeline.
///
/// Fit once over training data, saved as a single JSON artifact, and loaded
/// read-only at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPipeline {
    preprocessor: Preprocessor,
    classifier: LogisticRegression,
}

impl ModelPipeline {
    /// Fit the preprocessing stages and the classifier over an encoded
    /// input matrix (one column per schema field, codes for categoricals).
    pub fn fit(x: &Array2<f64>, categorical: &[bool], y: &[u32], config: &ModelConfig) -> Self {
        let preprocessor = Preprocessor::fit(x, categorical);
        let features = preprocessor.transform(x);
        let classifier = LogisticRegression::fit(&features, y, config);
        ModelPipeline {
            preprocessor,
            classifier,
        }
    }

    /// Predict the class id for one encoded input row. This is the only
    /// inference entry point; callers depend on nothing else.
    pub fn predict(&self, row: &[f64]) -> u32 {
        self.classifier.predict(&self.preprocessor.transform_row(row))
    }

    /// Fraction of rows whose predicted class matches `y`.
    pub fn score(&self, x: &Array2<f64>, y: &[u32]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let correct = x
            .rows()
            .into_iter()
            .zip(y)
            .filter(|(row, &label)| self.predict(row.as_slice().expect("contiguous row")) == label)
            .count();
        correct as f64 / y.len() as f64
    }

    /// Save the fitted pipeline to a pretty-printed JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a fitted pipeline. Missing or corrupt files fail with
    /// [`Error::ArtifactLoad`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        serde_json::from_str(&json).map_err(|e| Error::artifact(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn test_config() -> ModelConfig {
        ModelConfig {
            learning_rate: 0.5,
            l2_penalty: 0.0,
            max_iter: 1000,
        }
    }

    #[test]
    fn numeric_stage_standardizes_and_imputes() {
        let x = array![[2.0], [4.0], [f64::NAN], [6.0]];
        let pre = Preprocessor::fit(&x, &[false]);
        // mean 4, population std over {2,4,6}
        let std = (8.0f64 / 3.0).sqrt();
        let out = pre.transform_row(&[6.0]);
        assert!((out[0] - 2.0 / std).abs() < 1e-12);
        // NaN imputes to the mean, which standardizes to zero
        assert!(pre.transform_row(&[f64::NAN])[0].abs() < 1e-12);
    }

    #[test]
    fn categorical_stage_one_hot_ignores_unknown_codes() {
        let x = array![[0.0], [1.0], [1.0], [2.0]];
        let pre = Preprocessor::fit(&x, &[true]);
        assert_eq!(pre.output_dim(), 3);
        assert_eq!(pre.transform_row(&[1.0]), vec![0.0, 1.0, 0.0]);
        // A code never seen at fit time encodes as all zeros.
        assert_eq!(pre.transform_row(&[7.0]), vec![0.0, 0.0, 0.0]);
        // A missing cell imputes to the most frequent code.
        assert_eq!(pre.transform_row(&[f64::NAN]), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn logistic_regression_separates_a_toy_problem() {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let clf = LogisticRegression::fit(&x, &y, &test_config());
        for (row, &label) in x.rows().into_iter().zip(&y) {
            assert_eq!(clf.predict(row.as_slice().unwrap()), label);
        }
        assert!(clf.predict_proba(&[2.0]) > 0.9);
        assert!(clf.predict_proba(&[-2.0]) < 0.1);
    }

    #[test]
    fn pipeline_round_trips_through_json() {
        let x = array![[20.0, 0.0], [30.0, 1.0], [40.0, 0.0], [50.0, 1.0]];
        let y = [0, 1, 0, 1];
        let pipeline = ModelPipeline::fit(&x, &[false, true], &y, &test_config());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mental_health_model.json");
        pipeline.save(&path).unwrap();
        let loaded = ModelPipeline::load(&path).unwrap();

        for row in x.rows() {
            let row = row.as_slice().unwrap();
            assert_eq!(pipeline.predict(row), loaded.predict(row));
        }
        assert!((pipeline.score(&x, &y) - loaded.score(&x, &y)).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_model_file_is_artifact_load() {
        assert!(matches!(
            ModelPipeline::load("no/such/model.json"),
            Err(Error::ArtifactLoad { .. })
        ));
    }
}
