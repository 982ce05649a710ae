use crate::domain::model::{Species, BILL_DEPTH_MM, BILL_LENGTH_MM};
use crate::utils::error::{Result, ServiceError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One labelled training row, features in `FEATURE_NAMES` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub species: Species,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    species: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    bill_length_mm: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    bill_depth_mm: Option<f64>,
}

pub fn load_dataset_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let file = std::fs::File::open(&path)?;
    tracing::info!("Loading training data from {}", path.as_ref().display());
    load_dataset(file)
}

/// Columns are matched by header name; other columns are ignored. Rows with
/// `NA` measurements or an unknown species are skipped.
pub fn load_dataset<R: Read>(reader: R) -> Result<Vec<Sample>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["species", BILL_LENGTH_MM, BILL_DEPTH_MM] {
        if !headers.iter().any(|h| h == required) {
            return Err(ServiceError::TrainingError {
                message: format!("training data has no '{}' column", required),
            });
        }
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row?;
        let species = match row.species.parse::<Species>() {
            Ok(species) => species,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        // 缺值 (NA) 的列直接略過
        match (row.bill_length_mm, row.bill_depth_mm) {
            (Some(length), Some(depth)) if length.is_finite() && depth.is_finite() => {
                samples.push(Sample {
                    features: vec![length, depth],
                    species,
                });
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} incomplete or unlabelled rows", skipped);
    }

    if samples.is_empty() {
        return Err(ServiceError::TrainingError {
            message: "training data contains no usable rows".to_string(),
        });
    }

    tracing::debug!("Loaded {} training samples", samples.len());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dataset_skips_missing_values() {
        let data = "\
species,island,bill_length_mm,bill_depth_mm,sex
Adelie,Torgersen,39.1,18.7,male
Adelie,Torgersen,NA,NA,NA
Gentoo,Biscoe,46.1,13.2,female
Emperor,Ross,50.0,17.0,male
";
        let samples = load_dataset(data.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].features, vec![39.1, 18.7]);
        assert_eq!(samples[1].species, Species::Gentoo);
    }

    #[test]
    fn test_load_dataset_column_order_does_not_matter() {
        let data = "bill_depth_mm,species,bill_length_mm\n15.0,Gentoo,45.0\n";
        let samples = load_dataset(data.as_bytes()).unwrap();
        assert_eq!(samples[0].features, vec![45.0, 15.0]);
    }

    #[test]
    fn test_load_dataset_requires_columns() {
        let data = "species,bill_length_mm\nAdelie,39.1\n";
        assert!(matches!(
            load_dataset(data.as_bytes()),
            Err(ServiceError::TrainingError { .. })
        ));
    }

    #[test]
    fn test_load_dataset_rejects_empty_result() {
        let data = "species,bill_length_mm,bill_depth_mm\nAdelie,NA,NA\n";
        assert!(load_dataset(data.as_bytes()).is_err());
    }
}
