use crate::core::prediction::PredictionError;
use crate::server::types::ErrorBody;
use crate::utils::error::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::BadRequestError { .. } => StatusCode::BAD_REQUEST,
            ServiceError::PredictionError(PredictionError::ModelUnavailable) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::ValidationError(_) => "validation_error",
            ServiceError::BadRequestError { .. } => "bad_request",
            ServiceError::PredictionError(PredictionError::ModelUnavailable) => "model_unavailable",
            ServiceError::PredictionError(_) => "inference_error",
            _ => "internal_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ {} (Category: {:?})", self, self.category());
        } else {
            tracing::info!("Rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.error_code(),
            message: self.user_friendly_message(),
            detail: match self {
                ServiceError::ValidationError(report) => Some(report.into_errors()),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}
