//! HTTP request handlers

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::core::guess::random_species;
use crate::core::prediction;
use crate::core::validator;
use crate::utils::error::{Result, ServiceError};

use super::types::{HealthResponse, ServiceInfo, SpeciesResponse};
use super::AppState;

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["GET /health", "GET /guess", "POST /predict"],
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model.is_some(),
    })
}

/// Random species, for comparing against the model.
pub async fn guess() -> Json<SpeciesResponse> {
    let species = random_species(&mut rand::rng());
    Json(SpeciesResponse { species })
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SpeciesResponse>> {
    let Json(payload) = payload.map_err(|rejection| ServiceError::BadRequestError {
        message: rejection.body_text(),
    })?;

    let payload = match payload {
        Value::Object(map) => map,
        other => {
            return Err(ServiceError::BadRequestError {
                message: format!(
                    "request body must be a JSON object, got {}",
                    validator::ValueKind::of(&other)
                ),
            })
        }
    };

    let record = validator::validate(&payload)?;
    let species = prediction::predict(&record, state.model.as_ref())?;
    Ok(Json(SpeciesResponse { species }))
}
