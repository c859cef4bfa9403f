//! Survey dataset loading and cleaning.
//!
//! The raw dataset is a CSV export of the survey with one column per schema
//! field, a `treatment` target column, and a handful of bookkeeping columns
//! (`Timestamp`, `state`, `comments`) that are dropped if present.

use crate::error::{Error, Result};
use crate::schema::{self, AGE_OUTLIER_MAX, AGE_OUTLIER_MIN, FEATURES, TARGET};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A cleaned survey dataset: one raw string value per schema column per row
/// (schema order), plus the target label per row.
///
/// Empty categorical cells are replaced with the literal category `"nan"`,
/// which therefore becomes part of the fitted vocabulary for columns with
/// missing responses (matching the artifacts the original survey produced).
#[derive(Debug, Clone)]
pub struct SurveyDataset {
    rows: Vec<Vec<String>>,
    targets: Vec<String>,
}

impl SurveyDataset {
    /// Number of retained rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row values in schema order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Target label per row.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// All values of one schema column, by column index.
    pub fn column(&self, idx: usize) -> Vec<&str> {
        self.rows.iter().map(|r| r[idx].as_str()).collect()
    }

    /// Select a subset of rows by index (used for splits and CV folds).
    pub fn subset(&self, indices: &[usize]) -> SurveyDataset {
        SurveyDataset {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i].clone()).collect(),
        }
    }
}

/// Load and clean a survey CSV from disk.
pub fn load_survey(path: impl AsRef<Path>) -> Result<SurveyDataset> {
    let file = File::open(path.as_ref())?;
    read_survey(file)
}

/// Load and clean a survey CSV from any reader.
///
/// Cleaning steps, in order:
/// 1. drop bookkeeping columns if present,
/// 2. drop rows with a missing `treatment` label,
/// 3. drop rows whose age falls outside the exclusive (15, 100) bounds,
/// 4. replace empty categorical cells with the `"nan"` category.
///
/// A missing schema column or an unparseable age cell is a malformed
/// dataset and aborts the run.
pub fn read_survey<R: Read>(reader: R) -> Result<SurveyDataset> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    let mut targets = Vec::new();

    for (line, record) in rdr.deserialize::<HashMap<String, String>>().enumerate() {
        let mut record = record?;
        for col in schema::DROPPED_COLUMNS {
            record.remove(*col);
        }

        // Missing target label: the row carries no supervision, skip it.
        let target = match record.remove(TARGET) {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => continue,
        };

        let mut row = Vec::with_capacity(FEATURES.len());
        let mut keep = true;
        for field in FEATURES {
            let cell = record
                .get(field.name)
                .ok_or_else(|| Error::Dataset(format!("missing column `{}`", field.name)))?
                .trim();

            if field.is_categorical() {
                row.push(if cell.is_empty() {
                    "nan".to_string()
                } else {
                    cell.to_string()
                });
            } else {
                let age: i64 = cell.parse().map_err(|_| {
                    Error::Dataset(format!(
                        "row {}: unparseable `{}` value `{cell}`",
                        line + 2,
                        field.name
                    ))
                })?;
                if age <= AGE_OUTLIER_MIN || age >= AGE_OUTLIER_MAX {
                    keep = false;
                    break;
                }
                row.push(cell.to_string());
            }
        }

        if keep {
            rows.push(row);
            targets.push(target);
        }
    }

    Ok(SurveyDataset { rows, targets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn survey_csv(body: &str) -> String {
        let mut header: Vec<&str> = FEATURES.iter().map(|f| f.name).collect();
        header.push(TARGET);
        format!("{}\n{}", header.join(","), body)
    }

    fn row_with_age(age: &str, treatment: &str) -> String {
        let mut cells = vec![age.to_string()];
        for field in &FEATURES[1..] {
            match field.domain {
                crate::schema::Domain::Choice(options) => cells.push(options[0].to_string()),
                crate::schema::Domain::Range { .. } => unreachable!(),
            }
        }
        cells.push(treatment.to_string());
        cells.join(",")
    }

    #[test]
    fn keeps_plausible_rows() {
        let csv = survey_csv(&row_with_age("29", "No"));
        let ds = read_survey(Cursor::new(csv)).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.targets(), ["No"]);
        assert_eq!(ds.rows()[0][0], "29");
    }

    #[test]
    fn drops_missing_target_and_outlier_ages() {
        let body = [
            row_with_age("29", "Yes"),
            row_with_age("29", ""),   // no label
            row_with_age("15", "No"), // bound is exclusive
            row_with_age("100", "No"),
            row_with_age("16", "No"),
            row_with_age("99", "No"),
        ]
        .join("\n");
        let ds = read_survey(Cursor::new(survey_csv(&body))).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn empty_categorical_cell_becomes_nan_category() {
        let full = row_with_age("30", "Yes");
        let mut cells: Vec<&str> = full.split(',').collect();
        cells[4] = ""; // work_interfere
        let ds = read_survey(Cursor::new(survey_csv(&cells.join(",")))).unwrap();
        assert_eq!(ds.rows()[0][4], "nan");
    }

    #[test]
    fn unparseable_age_is_fatal() {
        let csv = survey_csv(&row_with_age("thirty", "Yes"));
        assert!(matches!(
            read_survey(Cursor::new(csv)),
            Err(Error::Dataset(_))
        ));
    }

    #[test]
    fn missing_schema_column_is_fatal() {
        let csv = "Age,treatment\n29,Yes\n";
        assert!(matches!(
            read_survey(Cursor::new(csv)),
            Err(Error::Dataset(_))
        ));
    }
}
