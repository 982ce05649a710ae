use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BILL_LENGTH_MM: &str = "bill_length_mm";
pub const BILL_DEPTH_MM: &str = "bill_depth_mm";

/// Column order shared by training and inference.
pub const FEATURE_NAMES: [&str; 2] = [BILL_LENGTH_MM, BILL_DEPTH_MM];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Chinstrap, Species::Gentoo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Species::Adelie => 0,
            Species::Chinstrap => 1,
            Species::Gentoo => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    // 資料集裡常見 "Adelie Penguin (Pygoscelis adeliae)" 這種全名，只看第一個字
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let head = s.split_whitespace().next().unwrap_or("");
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.as_str().eq_ignore_ascii_case(head))
            .ok_or_else(|| format!("unknown species: {}", s))
    }
}

/// A validated observation. Only the validator can build one, so holding a
/// `MeasurementRecord` means both values are inside their bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementRecord {
    bill_length_mm: f64,
    bill_depth_mm: f64,
}

impl MeasurementRecord {
    pub(crate) fn new_unchecked(bill_length_mm: f64, bill_depth_mm: f64) -> Self {
        Self {
            bill_length_mm,
            bill_depth_mm,
        }
    }

    pub fn bill_length_mm(&self) -> f64 {
        self.bill_length_mm
    }

    pub fn bill_depth_mm(&self) -> f64 {
        self.bill_depth_mm
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn features(&self) -> [f64; 2] {
        [self.bill_length_mm, self.bill_depth_mm]
    }
}

/// Row-major table with named columns, the shape classifiers consume.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Option<Self> {
        if rows.iter().any(|row| row.len() != columns.len()) {
            return None;
        }
        Some(Self { columns, rows })
    }

    pub fn from_record(record: &MeasurementRecord) -> Self {
        Self {
            columns: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            rows: vec![record.features().to_vec()],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Rows with columns rearranged into `order`. `None` when a requested
    /// column is missing.
    pub fn select(&self, order: &[String]) -> Option<Vec<Vec<f64>>> {
        let positions = order
            .iter()
            .map(|name| self.columns.iter().position(|c| c == name))
            .collect::<Option<Vec<_>>>()?;

        Some(
            self.rows
                .iter()
                .map(|row| positions.iter().map(|&i| row[i]).collect())
                .collect(),
        )
    }
}
