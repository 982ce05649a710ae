use anyhow::Result;
use penguin_api::core::dataset::load_dataset_from_path;
use penguin_api::core::training::{train, TrainingParams};
use penguin_api::core::{ClassifierHandle, Species};
use penguin_api::server::types::{HealthResponse, SpeciesResponse};
use penguin_api::server::{self, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

fn trained_model() -> ClassifierHandle {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/penguins_sample.csv");
    let samples = load_dataset_from_path(path).unwrap();
    Arc::new(train(&samples, &TrainingParams::default()).unwrap())
}

async fn spawn_server(model: Option<ClassifierHandle>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let cors = server::build_cors(&["*".to_string()])?;
    let app = server::router(AppState::new(model), cors);

    tokio::spawn(server::serve(listener, app, std::future::pending()));
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_root_lists_endpoints() -> Result<()> {
    let base = spawn_server(None).await?;
    let body: Value = reqwest::get(format!("{}/", base)).await?.json().await?;

    assert_eq!(body["service"], "penguin-api");
    assert!(body["endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("POST /predict")));
    Ok(())
}

#[tokio::test]
async fn test_health_reports_model_state() -> Result<()> {
    let without = spawn_server(None).await?;
    let health: HealthResponse = reqwest::get(format!("{}/health", without)).await?.json().await?;
    assert_eq!(health.status, "ok");
    assert!(!health.model_loaded);

    let with = spawn_server(Some(trained_model())).await?;
    let health: HealthResponse = reqwest::get(format!("{}/health", with)).await?.json().await?;
    assert!(health.model_loaded);
    Ok(())
}

#[tokio::test]
async fn test_guess_returns_a_known_species() -> Result<()> {
    let base = spawn_server(None).await?;
    for _ in 0..5 {
        let response = reqwest::get(format!("{}/guess", base)).await?;
        assert_eq!(response.status(), 200);
        let body: SpeciesResponse = response.json().await?;
        assert!(Species::ALL.contains(&body.species));
    }
    Ok(())
}

#[tokio::test]
async fn test_predict_with_trained_model() -> Result<()> {
    let base = spawn_server(Some(trained_model())).await?;
    let client = reqwest::Client::new();

    let gentoo: SpeciesResponse = client
        .post(format!("{}/predict", base))
        .json(&json!({"bill_length_mm": 45, "bill_depth_mm": 15}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(gentoo.species, Species::Gentoo);

    // 數字字串與多餘欄位都可接受
    let response = client
        .post(format!("{}/predict", base))
        .json(&json!({"bill_depth_mm": "18", "bill_length_mm": 35, "island": "Dream"}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"species": "Adelie"}));
    Ok(())
}

#[tokio::test]
async fn test_predict_reports_every_violation() -> Result<()> {
    let base = spawn_server(Some(trained_model())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&json!({"bill_length_mm": 32}))
        .send()
        .await?;

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        body["detail"],
        json!([
            {"kind": "out_of_range", "field": "bill_length_mm", "value": 32.0, "lower_bound": 32.0, "upper_bound": 60.0},
            {"kind": "missing_field", "field": "bill_depth_mm"}
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_predict_rejects_malformed_bodies() -> Result<()> {
    let base = spawn_server(Some(trained_model())).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/predict", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/predict", base))
        .json(&json!([45, 15]))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "bad_request");
    Ok(())
}

#[tokio::test]
async fn test_predict_without_model_is_unavailable() -> Result<()> {
    let base = spawn_server(None).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&json!({"bill_length_mm": 45, "bill_depth_mm": 15}))
        .send()
        .await?;

    assert_eq!(response.status(), 503);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "model_unavailable");
    Ok(())
}

#[tokio::test]
async fn test_validation_runs_before_model_lookup() -> Result<()> {
    let base = spawn_server(None).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&json!({"bill_length_mm": "hello", "bill_depth_mm": 15}))
        .send()
        .await?;

    assert_eq!(response.status(), 422);
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin() -> Result<()> {
    let base = spawn_server(None).await?;
    let response = reqwest::Client::new()
        .get(format!("{}/guess", base))
        .header("origin", "http://notebook.example")
        .send()
        .await?;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}
