//! Per-feature categorical encoders and the persisted encoder bundle.
//!
//! Each categorical survey column gets one [`CategoryEncoder`]: a bijective
//! mapping from every category string observed at training time to a dense
//! integer code. Encoders are fitted once during training and loaded
//! read-only at inference time. The bundle additionally carries the target
//! label encoder under the reserved [`TARGET_KEY`](crate::schema::TARGET_KEY)
//! entry.

use crate::error::{Error, Result};
use crate::schema::TARGET_KEY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Bijective string -> integer code mapping fitted from one column's
/// observed values.
///
/// Classes are sorted lexicographically at fit time, so refitting on the
/// same data always yields the same codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryEncoder {
    /// Fitted vocabulary, sorted; the code of a class is its index here.
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Fit an encoder over a column's observed values. Duplicates are
    /// collapsed; the resulting class list is sorted.
    pub fn fit<S: AsRef<str>>(values: &[S]) -> Self {
        let mut classes: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        CategoryEncoder { classes }
    }

    /// Forward mapping. Fails with [`Error::UnknownCategory`] for any value
    /// outside the fitted vocabulary; `feature` names the offending column
    /// in the error.
    pub fn encode(&self, feature: &str, value: &str) -> Result<u32> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map(|idx| idx as u32)
            .map_err(|_| Error::UnknownCategory {
                feature: feature.to_string(),
                value: value.to_string(),
            })
    }

    /// Inverse mapping from a code back to its category string.
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// The fitted vocabulary, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct fitted categories.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Feature name -> encoder mapping persisted alongside the model, with the
/// target encoder stored under the reserved `__target__` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncoderBundle {
    encoders: BTreeMap<String, CategoryEncoder>,
}

impl EncoderBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the encoder for a feature column.
    pub fn insert(&mut self, feature: impl Into<String>, encoder: CategoryEncoder) {
        self.encoders.insert(feature.into(), encoder);
    }

    /// Register the reserved target label encoder.
    pub fn insert_target(&mut self, encoder: CategoryEncoder) {
        self.encoders.insert(TARGET_KEY.to_string(), encoder);
    }

    /// Encoder for a feature column, if the column is categorical.
    pub fn get(&self, feature: &str) -> Option<&CategoryEncoder> {
        self.encoders.get(feature)
    }

    /// The reserved target label encoder.
    pub fn target(&self) -> Option<&CategoryEncoder> {
        self.encoders.get(TARGET_KEY)
    }

    /// Save the bundle to a pretty-printed JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a bundle from a JSON file.
    ///
    /// Missing or corrupt files, and bundles without a target encoder, fail
    /// with [`Error::ArtifactLoad`]: without the bundle the process cannot
    /// serve predictions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
        let bundle: EncoderBundle =
            serde_json::from_str(&json).map_err(|e| Error::artifact(path, e))?;
        if bundle.target().is_none() {
            return Err(Error::artifact(path, "bundle has no target encoder"));
        }
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_work_encoder() -> CategoryEncoder {
        CategoryEncoder::fit(&["Yes", "No", "Yes", "No"])
    }

    #[test]
    fn codes_follow_sorted_class_order() {
        let enc = CategoryEncoder::fit(&["Sometimes", "Never", "Often", "Rarely"]);
        assert_eq!(enc.classes(), ["Never", "Often", "Rarely", "Sometimes"]);
        assert_eq!(enc.encode("work_interfere", "Never").unwrap(), 0);
        assert_eq!(enc.encode("work_interfere", "Sometimes").unwrap(), 3);
    }

    #[test]
    fn round_trip_every_fitted_category() {
        let enc = remote_work_encoder();
        for class in enc.classes().to_vec() {
            let code = enc.encode("remote_work", &class).unwrap();
            assert_eq!(enc.decode(code), Some(class.as_str()));
        }
    }

    #[test]
    fn unknown_category_is_a_typed_error() {
        let enc = remote_work_encoder();
        let err = enc.encode("remote_work", "Maybe").unwrap_err();
        match err {
            crate::error::Error::UnknownCategory { feature, value } => {
                assert_eq!(feature, "remote_work");
                assert_eq!(value, "Maybe");
            }
            other => panic!("expected UnknownCategory, got {other}"),
        }
    }

    #[test]
    fn bundle_requires_target_encoder_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoders.json");

        let mut bundle = EncoderBundle::new();
        bundle.insert("remote_work", remote_work_encoder());
        bundle.save(&path).unwrap();
        assert!(matches!(
            EncoderBundle::load(&path),
            Err(crate::error::Error::ArtifactLoad { .. })
        ));

        bundle.insert_target(CategoryEncoder::fit(&["Yes", "No"]));
        bundle.save(&path).unwrap();
        let loaded = EncoderBundle::load(&path).unwrap();
        assert_eq!(loaded.get("remote_work").unwrap(), &remote_work_encoder());
        assert_eq!(loaded.target().unwrap().classes(), ["No", "Yes"]);
    }

    #[test]
    fn missing_bundle_file_is_artifact_load() {
        let err = EncoderBundle::load("no/such/label_encoders.json").unwrap_err();
        assert!(matches!(err, crate::error::Error::ArtifactLoad { .. }));
    }
}
