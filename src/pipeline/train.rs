//! The offline training pipeline.
//!
//! Orchestrates the full fit: load and clean the survey CSV, fit per-column
//! encoders and the target encoder, split deterministically, fit the
//! preprocessing + logistic regression pipeline, report metrics, and
//! persist the two artifacts. Training is a human-supervised batch step, so
//! progress and results go straight to stdout.

use crate::encoder::{CategoryEncoder, EncoderBundle};
use crate::error::{Error, Result};
use crate::pipeline::config::Config;
use crate::pipeline::dataset::{load_survey, SurveyDataset};
use crate::pipeline::evaluate::{classification_report, confusion_matrix, cross_validate};
use crate::pipeline::model::ModelPipeline;
use crate::schema::FEATURES;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

/// Fit one encoder per categorical schema column plus the reserved target
/// encoder, over the full cleaned dataset.
pub fn fit_encoders(dataset: &SurveyDataset) -> EncoderBundle {
    let mut bundle = EncoderBundle::new();
    for (idx, field) in FEATURES.iter().enumerate() {
        if field.is_categorical() {
            bundle.insert(field.name, CategoryEncoder::fit(&dataset.column(idx)));
        }
    }
    bundle.insert_target(CategoryEncoder::fit(dataset.targets()));
    bundle
}

/// Encode the cleaned dataset into the pipeline's numeric input space:
/// categorical cells become their encoder codes, numeric cells parse
/// directly. Returns the input matrix and the encoded target per row.
pub fn encode_dataset(
    dataset: &SurveyDataset,
    encoders: &EncoderBundle,
) -> Result<(Array2<f64>, Vec<u32>)> {
    let mut cells = Vec::with_capacity(dataset.len() * FEATURES.len());
    for row in dataset.rows() {
        for (field, value) in FEATURES.iter().zip(row) {
            if let Some(encoder) = encoders.get(field.name) {
                cells.push(f64::from(encoder.encode(field.name, value)?));
            } else {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| Error::Dataset(format!("non-numeric `{}`: {value}", field.name)))?;
                cells.push(parsed);
            }
        }
    }
    let x = Array2::from_shape_vec((dataset.len(), FEATURES.len()), cells)
        .expect("row width matches schema");

    let target = encoders
        .target()
        .ok_or_else(|| Error::Dataset("no target encoder fitted".into()))?;
    let y = dataset
        .targets()
        .iter()
        .map(|t| target.encode(crate::schema::TARGET, t))
        .collect::<Result<Vec<u32>>>()?;
    Ok((x, y))
}

/// Categorical mask over the schema columns, in order.
pub fn categorical_mask() -> Vec<bool> {
    FEATURES.iter().map(|f| f.is_categorical()).collect()
}

/// Deterministic shuffled train/test split over row indices.
fn split_indices(n: usize, train_split: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let cut = (n as f64 * train_split) as usize;
    (indices[..cut].to_vec(), indices[cut..].to_vec())
}

/// Run the full training pipeline and persist the artifacts.
pub fn train_model(config: &Config) -> Result<()> {
    println!("\n===================================================================");
    println!("  NeuroLens: Mental Health Screening Classifier");
    println!("  survey encoders + logistic regression pipeline");
    println!("===================================================================\n");

    println!("Configuration:");
    println!("  Data: {}", config.data.csv_path);
    println!(
        "  Train/Test split: {:.0}%/{:.0}% (seed {})",
        config.data.train_split * 100.0,
        (1.0 - config.data.train_split) * 100.0,
        config.training.seed
    );
    println!("  Classifier: logistic regression (max_iter {})", config.model.max_iter);
    println!("  CV folds: {}\n", config.training.cv_folds);

    println!("Loading dataset...");
    let start = Instant::now();
    let dataset = load_survey(&config.data.csv_path)?;
    println!(
        "  Retained {} rows after cleaning ({:.2}s)\n",
        dataset.len(),
        start.elapsed().as_secs_f64()
    );
    if dataset.is_empty() {
        return Err(Error::Dataset("no usable rows after cleaning".into()));
    }

    println!("Fitting categorical encoders...");
    let encoders = fit_encoders(&dataset);
    let target_classes: Vec<String> = encoders
        .target()
        .expect("target encoder fitted above")
        .classes()
        .to_vec();
    println!("  Target classes: {:?}\n", target_classes);

    let (x, y) = encode_dataset(&dataset, &encoders)?;
    let mask = categorical_mask();

    let (train_idx, test_idx) =
        split_indices(dataset.len(), config.data.train_split, config.training.seed);
    println!("Train: {} | Test: {}\n", train_idx.len(), test_idx.len());

    let train_x = x.select(ndarray::Axis(0), &train_idx);
    let train_y: Vec<u32> = train_idx.iter().map(|&i| y[i]).collect();
    let test_x = x.select(ndarray::Axis(0), &test_idx);
    let test_y: Vec<u32> = test_idx.iter().map(|&i| y[i]).collect();

    println!("Fitting pipeline...");
    let fit_start = Instant::now();
    let pipeline = ModelPipeline::fit(&train_x, &mask, &train_y, &config.model);
    println!("  Done ({:.2}s)\n", fit_start.elapsed().as_secs_f64());

    println!("===================================================================\n");
    println!("Model trained successfully!\n");
    println!("Training Score: {:.4}", pipeline.score(&train_x, &train_y));
    println!("Testing Score:  {:.4}\n", pipeline.score(&test_x, &test_y));

    let test_pred: Vec<u32> = test_x
        .rows()
        .into_iter()
        .map(|row| pipeline.predict(row.as_slice().expect("contiguous row")))
        .collect();

    let matrix = confusion_matrix(&test_y, &test_pred);
    println!("Confusion Matrix:");
    println!("  [{:>5} {:>5}]", matrix[0][0], matrix[0][1]);
    println!("  [{:>5} {:>5}]\n", matrix[1][0], matrix[1][1]);

    println!("Classification Report:");
    let names: Vec<&str> = target_classes.iter().map(String::as_str).collect();
    println!("{}", classification_report(&test_y, &test_pred, &names));

    let cv_scores = cross_validate(&x, &mask, &y, config);
    let cv_mean = cv_scores.iter().sum::<f64>() / cv_scores.len() as f64;
    println!("Cross-Validation Scores: {:?}", cv_scores);
    println!("CV Accuracy: {cv_mean:.4}\n");

    std::fs::create_dir_all(&config.output.model_dir)?;
    let model_path = Path::new(&config.output.model_dir).join(&config.output.model_file);
    let encoders_path = Path::new(&config.output.model_dir).join(&config.output.encoders_file);
    pipeline.save(&model_path)?;
    encoders.save(&encoders_path)?;

    println!("Model saved to: {}", model_path.display());
    println!("Label encoders saved to: {}\n", encoders_path.display());

    Ok(())
}
