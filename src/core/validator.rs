use crate::domain::model::{MeasurementRecord, BILL_DEPTH_MM, BILL_LENGTH_MM};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Exclusive numeric bounds for one measurement field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub name: &'static str,
    pub lower: f64,
    pub upper: f64,
}

impl FieldBounds {
    pub fn contains(&self, value: f64) -> bool {
        self.lower < value && value < self.upper
    }
}

pub const BILL_LENGTH_BOUNDS: FieldBounds = FieldBounds {
    name: BILL_LENGTH_MM,
    lower: 32.0,
    upper: 60.0,
};

pub const BILL_DEPTH_BOUNDS: FieldBounds = FieldBounds {
    name: BILL_DEPTH_MM,
    lower: 13.0,
    upper: 22.0,
};

/// JSON type of a rejected value, as reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("field '{field}' is required")]
    MissingField { field: String },

    #[error("field '{field}' must be a number, got {received}")]
    WrongType { field: String, received: ValueKind },

    #[error("field '{field}' must be greater than {lower_bound} and less than {upper_bound}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}

/// Every violation found in one payload, in field declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Vec<ValidationError>> for ValidationReport {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Accepts JSON numbers and strings holding a finite float.
fn coerce_number(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: field.to_string(),
        received: ValueKind::of(value),
    };

    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).ok_or_else(wrong_type),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(wrong_type),
        _ => Err(wrong_type()),
    }
}

fn check_field(payload: &Map<String, Value>, bounds: &FieldBounds) -> Result<f64, ValidationError> {
    let raw = payload
        .get(bounds.name)
        .ok_or_else(|| ValidationError::MissingField {
            field: bounds.name.to_string(),
        })?;

    let value = coerce_number(bounds.name, raw)?;

    if !bounds.contains(value) {
        return Err(ValidationError::OutOfRange {
            field: bounds.name.to_string(),
            value,
            lower_bound: bounds.lower,
            upper_bound: bounds.upper,
        });
    }

    Ok(value)
}

/// Reads the two measurement keys out of `payload`, ignoring anything else.
pub fn validate(payload: &Map<String, Value>) -> Result<MeasurementRecord, ValidationReport> {
    let length = check_field(payload, &BILL_LENGTH_BOUNDS);
    let depth = check_field(payload, &BILL_DEPTH_BOUNDS);

    match (length, depth) {
        (Ok(length), Ok(depth)) => Ok(MeasurementRecord::new_unchecked(length, depth)),
        (length, depth) => Err(ValidationReport::from(
            [length.err(), depth.err()].into_iter().flatten().collect::<Vec<_>>(),
        )),
    }
}

/// Same rules as [`validate`] for callers that already hold typed values.
pub fn validate_values(bill_length_mm: f64, bill_depth_mm: f64) -> Result<MeasurementRecord, ValidationReport> {
    let mut payload = Map::new();
    payload.insert(BILL_LENGTH_MM.to_string(), Value::from(bill_length_mm));
    payload.insert(BILL_DEPTH_MM.to_string(), Value::from(bill_depth_mm));
    validate(&payload)
}
