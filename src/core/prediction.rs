use crate::domain::model::{FeatureFrame, MeasurementRecord, Species};
use crate::domain::ports::ClassifierHandle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
    #[error("no classifier is loaded")]
    ModelUnavailable,

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Runs the classifier on a single validated record.
pub fn predict(
    record: &MeasurementRecord,
    model: Option<&ClassifierHandle>,
) -> Result<Species, PredictionError> {
    let model = model.ok_or(PredictionError::ModelUnavailable)?;
    let frame = FeatureFrame::from_record(record);

    let missing: Vec<&str> = model
        .feature_names()
        .iter()
        .filter(|name| !frame.columns().contains(*name))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(PredictionError::Inference(format!(
            "model expects features {:?} that requests do not carry",
            missing
        )));
    }

    let labels = model.predict(&frame).map_err(PredictionError::Inference)?;
    let species = labels
        .first()
        .copied()
        .ok_or_else(|| PredictionError::Inference("classifier returned no label".to_string()))?;

    tracing::debug!(
        bill_length_mm = record.bill_length_mm(),
        bill_depth_mm = record.bill_depth_mm(),
        %species,
        "prediction"
    );
    Ok(species)
}
