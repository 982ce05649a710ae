use crate::core::prediction::PredictionError;
use crate::core::validator::ValidationReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Request validation failed: {0}")]
    ValidationError(#[from] ValidationReport),

    #[error("Malformed request: {message}")]
    BadRequestError { message: String },

    #[error("Prediction failed: {0}")]
    PredictionError(#[from] PredictionError),

    #[error("Model artifact error: {message}")]
    ModelArtifactError { message: String },

    #[error("Training error: {message}")]
    TrainingError { message: String },

    #[error("Remote service returned {status}: {body}")]
    RemoteError { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Model,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::ValidationError(_) | ServiceError::BadRequestError { .. } => {
                ErrorCategory::Input
            }
            ServiceError::ConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. }
            | ServiceError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ServiceError::PredictionError(_)
            | ServiceError::ModelArtifactError { .. }
            | ServiceError::TrainingError { .. }
            | ServiceError::CsvError(_) => ErrorCategory::Model,
            ServiceError::ApiError(_) | ServiceError::RemoteError { .. } => {
                ErrorCategory::Network
            }
            ServiceError::IoError(_) | ServiceError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::ValidationError(_) | ServiceError::BadRequestError { .. } => {
                ErrorSeverity::Low
            }
            ServiceError::ApiError(_) | ServiceError::RemoteError { .. } => ErrorSeverity::Medium,
            ServiceError::PredictionError(PredictionError::ModelUnavailable) => {
                ErrorSeverity::Critical
            }
            ServiceError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ServiceError::ValidationError(_) => {
                "Resubmit with bill_length_mm in (32, 60) and bill_depth_mm in (13, 22)"
            }
            ServiceError::BadRequestError { .. } => {
                "Send a JSON object body with Content-Type: application/json"
            }
            ServiceError::PredictionError(PredictionError::ModelUnavailable)
            | ServiceError::ModelArtifactError { .. } => {
                "Train a model with `train_model` and point [model].path at the artifact"
            }
            ServiceError::PredictionError(_) => {
                "Retrain the model so its feature names match bill_length_mm, bill_depth_mm"
            }
            ServiceError::TrainingError { .. } | ServiceError::CsvError(_) => {
                "Check the training CSV has species, bill_length_mm and bill_depth_mm columns"
            }
            ServiceError::ConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. }
            | ServiceError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
            ServiceError::ApiError(_) | ServiceError::RemoteError { .. } => {
                "Check the server is running and the base URL is correct"
            }
            ServiceError::IoError(_) | ServiceError::SerializationError(_) => {
                "Check file paths and permissions"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::ValidationError(report) => {
                format!("Invalid measurements: {}", report)
            }
            ServiceError::PredictionError(PredictionError::ModelUnavailable) => {
                "No classifier is loaded".to_string()
            }
            ServiceError::RemoteError { status, .. } => {
                format!("Server rejected the request (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
