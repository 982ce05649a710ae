use anyhow::Result;
use penguin_api::core::artifact::{load_classifier, load_model, save_model};
use penguin_api::core::dataset::load_dataset_from_path;
use penguin_api::core::training::{cross_validate, train, TrainingParams};
use penguin_api::core::validator::validate_values;
use penguin_api::core::{prediction, ModelStore, Species};
use penguin_api::{LocalStorage, ServiceError};
use tempfile::TempDir;

const SAMPLE_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/penguins_sample.csv");

#[test]
fn test_sample_dataset_loads_without_na_rows() -> Result<()> {
    let samples = load_dataset_from_path(SAMPLE_DATA)?;

    assert_eq!(samples.len(), 43);
    for species in Species::ALL {
        assert!(samples.iter().any(|s| s.species == species));
    }
    Ok(())
}

#[test]
fn test_cross_validation_on_sample_dataset() -> Result<()> {
    let samples = load_dataset_from_path(SAMPLE_DATA)?;
    let cv = cross_validate(&samples, &TrainingParams::default())?;

    assert_eq!(cv.fold_accuracies.len(), 5);
    assert!(cv.mean_accuracy > 0.85, "mean accuracy {}", cv.mean_accuracy);
    Ok(())
}

#[tokio::test]
async fn test_train_save_reload_predict() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let samples = load_dataset_from_path(SAMPLE_DATA)?;
    let model = train(&samples, &TrainingParams::default())?;
    assert!(model.cv_accuracy.is_some());

    save_model(&storage, "models/penguins.json", &model).await?;
    let reloaded = load_model(&storage, "models/penguins.json").await?;
    assert_eq!(reloaded.feature_names, model.feature_names);
    assert_eq!(reloaded.classes, model.classes);
    assert_eq!(reloaded.n_samples, 43);
    assert_eq!(reloaded.trained_at, model.trained_at);

    let handle = load_classifier(&storage, "models/penguins.json").await?;
    let gentoo = validate_values(45.0, 15.0).unwrap();
    let adelie = validate_values(35.0, 18.0).unwrap();
    assert_eq!(prediction::predict(&gentoo, Some(&handle))?, Species::Gentoo);
    assert_eq!(prediction::predict(&adelie, Some(&handle))?, Species::Adelie);
    Ok(())
}

#[tokio::test]
async fn test_unknown_artifact_version_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let samples = load_dataset_from_path(SAMPLE_DATA)?;
    let mut model = train(&samples, &TrainingParams::default())?;
    model.format_version = 99;
    save_model(&storage, "old.json", &model).await?;

    assert!(matches!(
        load_classifier(&storage, "old.json").await,
        Err(ServiceError::ModelArtifactError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_artifact_is_serialization_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    storage.write_bytes("broken.json", b"{\"format_version\": 1").await?;

    assert!(matches!(
        load_classifier(&storage, "broken.json").await,
        Err(ServiceError::SerializationError(_))
    ));
    Ok(())
}
