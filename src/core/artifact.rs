use crate::core::training::{TrainedModel, MODEL_FORMAT_VERSION};
use crate::domain::model::FEATURE_NAMES;
use crate::domain::ports::{ClassifierHandle, ModelStore};
use crate::utils::error::{Result, ServiceError};
use std::collections::HashSet;
use std::sync::Arc;

pub async fn save_model<S: ModelStore + ?Sized>(store: &S, name: &str, model: &TrainedModel) -> Result<()> {
    let data = serde_json::to_vec_pretty(model)?;
    store.write_bytes(name, &data).await?;
    tracing::info!("💾 Model artifact written: {} ({} bytes)", name, data.len());
    Ok(())
}

pub async fn load_model<S: ModelStore + ?Sized>(store: &S, name: &str) -> Result<TrainedModel> {
    let data = store.read_bytes(name).await?;
    let model: TrainedModel = serde_json::from_slice(&data)?;

    if model.format_version != MODEL_FORMAT_VERSION {
        return Err(ServiceError::ModelArtifactError {
            message: format!(
                "unsupported format_version {} (expected {})",
                model.format_version, MODEL_FORMAT_VERSION
            ),
        });
    }

    if model.feature_names != FEATURE_NAMES {
        return Err(ServiceError::ModelArtifactError {
            message: format!("artifact trained on unexpected features {:?}", model.feature_names),
        });
    }

    if model.classes.is_empty() {
        return Err(ServiceError::ModelArtifactError {
            message: "artifact has no classes".to_string(),
        });
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = model.classes.iter().find(|c| !seen.insert(**c)) {
        return Err(ServiceError::ModelArtifactError {
            message: format!("artifact lists class {} more than once", duplicate),
        });
    }

    if model.scaler.scale.iter().any(|s| !s.is_finite() || *s <= 0.0)
        || model.scaler.mean.iter().any(|m| !m.is_finite())
    {
        return Err(ServiceError::ModelArtifactError {
            message: "artifact scaler must have finite means and positive finite scales".to_string(),
        });
    }

    let n_features = model.feature_names.len();
    let consistent = model.classes.len() == model.model.weights.len()
        && model.model.intercepts.len() == model.classes.len()
        && model.model.weights.iter().all(|w| w.len() == n_features)
        && model.scaler.mean.len() == n_features
        && model.scaler.scale.len() == n_features;
    if !consistent {
        return Err(ServiceError::ModelArtifactError {
            message: "artifact dimensions do not match its feature and class lists".to_string(),
        });
    }

    Ok(model)
}

/// Loads the artifact as the shared, read-only handle the server holds.
pub async fn load_classifier<S: ModelStore + ?Sized>(store: &S, name: &str) -> Result<ClassifierHandle> {
    let model = load_model(store, name).await?;
    tracing::info!(
        "📦 Loaded model trained at {} on {} samples (cv accuracy: {})",
        model.trained_at.to_rfc3339(),
        model.n_samples,
        model
            .cv_accuracy
            .map(|a| format!("{:.3}", a))
            .unwrap_or_else(|| "n/a".to_string())
    );
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::Sample;
    use crate::core::training::{fit_model, TrainingParams};
    use crate::domain::model::Species;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ModelStore for MemoryStore {
        async fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(name).cloned().ok_or_else(|| {
                ServiceError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, name.to_string()))
            })
        }

        async fn write_bytes(&self, name: &str, data: &[u8]) -> Result<()> {
            self.files.lock().unwrap().insert(name.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn small_model() -> TrainedModel {
        let samples = vec![
            Sample { features: vec![38.0, 18.5], species: Species::Adelie },
            Sample { features: vec![50.0, 19.0], species: Species::Chinstrap },
            Sample { features: vec![47.0, 14.5], species: Species::Gentoo },
        ];
        fit_model(&samples, &TrainingParams::default()).unwrap()
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = MemoryStore::default();
        let model = small_model();

        tokio_test::block_on(save_model(&store, "m.json", &model)).unwrap();
        let loaded = tokio_test::block_on(load_model(&store, "m.json")).unwrap();
        assert_eq!(loaded.classes, Species::ALL.to_vec());
        assert_eq!(loaded.predict_row(&[47.0, 14.5]), Some(Species::Gentoo));
    }

    #[test]
    fn test_rejects_inconsistent_dimensions() {
        let store = MemoryStore::default();
        let mut model = small_model();
        model.model.weights.pop();

        tokio_test::block_on(save_model(&store, "m.json", &model)).unwrap();
        assert!(matches!(
            tokio_test::block_on(load_model(&store, "m.json")),
            Err(ServiceError::ModelArtifactError { .. })
        ));
    }

    fn assert_rejected(model: &TrainedModel) {
        let store = MemoryStore::default();
        tokio_test::block_on(save_model(&store, "m.json", model)).unwrap();
        assert!(matches!(
            tokio_test::block_on(load_classifier(&store, "m.json")),
            Err(ServiceError::ModelArtifactError { .. })
        ));
    }

    #[test]
    fn test_rejects_artifact_without_classes() {
        let mut model = small_model();
        model.classes.clear();
        model.model.weights.clear();
        model.model.intercepts.clear();
        assert_rejected(&model);
    }

    #[test]
    fn test_rejects_duplicate_classes() {
        let mut model = small_model();
        model.classes = vec![Species::Adelie, Species::Adelie, Species::Gentoo];
        assert_rejected(&model);
    }

    #[test]
    fn test_rejects_degenerate_scaler() {
        let mut model = small_model();
        model.scaler.scale[1] = 0.0;
        assert_rejected(&model);

        let mut model = small_model();
        model.scaler.scale[0] = -1.0;
        assert_rejected(&model);
    }

    #[test]
    fn test_rejects_unknown_format_version() {
        let mut model = small_model();
        model.format_version = MODEL_FORMAT_VERSION + 1;
        assert_rejected(&model);
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let store = MemoryStore::default();
        assert!(matches!(
            tokio_test::block_on(load_classifier(&store, "absent.json")),
            Err(ServiceError::IoError(_))
        ));
    }
}
