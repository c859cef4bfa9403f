//! Evaluation metrics for the fitted pipeline.
//!
//! Accuracy, the 2x2 confusion matrix, a per-class precision/recall/F1
//! report and k-fold cross-validation, reported by the training CLI after a
//! fit.

use crate::pipeline::config::Config;
use crate::pipeline::model::ModelPipeline;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt::Write as _;

/// Fraction of matching prediction/label pairs.
pub fn accuracy(predictions: &[u32], labels: &[u32]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    correct as f64 / labels.len() as f64
}

/// 2x2 confusion matrix; `matrix[actual][predicted]`.
pub fn confusion_matrix(labels: &[u32], predictions: &[u32]) -> [[usize; 2]; 2] {
    let mut matrix = [[0usize; 2]; 2];
    for (&l, &p) in labels.iter().zip(predictions) {
        matrix[l.min(1) as usize][p.min(1) as usize] += 1;
    }
    matrix
}

/// Per-class precision / recall / F1 with supports, formatted as a table in
/// the shape of the report the training run prints.
pub fn classification_report(labels: &[u32], predictions: &[u32], class_names: &[&str]) -> String {
    let m = confusion_matrix(labels, predictions);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>12}  {:>9}  {:>6}  {:>8}  {:>7}",
        "", "precision", "recall", "f1-score", "support"
    );
    for class in 0..2 {
        let tp = m[class][class];
        let predicted = m[0][class] + m[1][class];
        let actual = m[class][0] + m[class][1];
        let precision = ratio(tp, predicted);
        let recall = ratio(tp, actual);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let name = class_names.get(class).copied().unwrap_or("?");
        let _ = writeln!(
            out,
            "{name:>12}  {precision:>9.2}  {recall:>6.2}  {f1:>8.2}  {actual:>7}"
        );
    }
    let acc = accuracy(predictions, labels);
    let _ = writeln!(out, "\n{:>12}  {acc:>28.4}", "accuracy");
    out
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// K-fold cross-validation accuracy over the full encoded dataset.
///
/// Rows are shuffled with the configured seed, partitioned into
/// `config.training.cv_folds` folds, and for each fold a fresh pipeline is
/// fitted on the remainder and scored on the held-out fold.
pub fn cross_validate(
    x: &Array2<f64>,
    categorical: &[bool],
    y: &[u32],
    config: &Config,
) -> Vec<f64> {
    let folds = config.training.cv_folds.max(2);
    let mut indices: Vec<usize> = (0..y.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.training.seed);
    indices.shuffle(&mut rng);

    let mut scores = Vec::with_capacity(folds);
    let fold_size = y.len().div_ceil(folds);
    for fold in indices.chunks(fold_size) {
        let held: std::collections::HashSet<usize> = fold.iter().copied().collect();
        let train_idx: Vec<usize> = indices.iter().copied().filter(|i| !held.contains(i)).collect();

        let train_x = x.select(Axis(0), &train_idx);
        let train_y: Vec<u32> = train_idx.iter().map(|&i| y[i]).collect();
        let test_x = x.select(Axis(0), fold);
        let test_y: Vec<u32> = fold.iter().map(|&i| y[i]).collect();

        let pipeline = ModelPipeline::fit(&train_x, categorical, &train_y, &config.model);
        scores.push(pipeline.score(&test_x, &test_y));
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accuracy_counts_matches() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 0, 0, 1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn confusion_matrix_layout_is_actual_by_predicted() {
        let m = confusion_matrix(&[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        assert_eq!(m, [[1, 1], [1, 2]]);
    }

    #[test]
    fn classification_report_names_both_classes() {
        let report = classification_report(&[0, 1, 1, 0], &[0, 1, 0, 0], &["No", "Yes"]);
        assert!(report.contains("No"));
        assert!(report.contains("Yes"));
        assert!(report.contains("accuracy"));
    }

    #[test]
    fn cross_validation_produces_one_score_per_fold() {
        // A cleanly separable column so every fold scores perfectly.
        let x = array![
            [-2.0],
            [-1.9],
            [-1.8],
            [-1.7],
            [-1.6],
            [1.6],
            [1.7],
            [1.8],
            [1.9],
            [2.0]
        ];
        let y = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let mut config = Config::default();
        config.training.cv_folds = 5;
        config.model.learning_rate = 0.5;
        let scores = cross_validate(&x, &[false], &y, &config);
        assert_eq!(scores.len(), 5);
        for s in scores {
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
