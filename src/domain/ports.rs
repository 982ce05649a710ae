use crate::domain::model::{FeatureFrame, Species};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A fitted model that only does inference.
pub trait Classifier: Send + Sync {
    /// Column names the model was trained on, in training order.
    fn feature_names(&self) -> &[String];

    /// One label per frame row.
    fn predict(&self, frame: &FeatureFrame) -> std::result::Result<Vec<Species>, String>;
}

/// Shared, read-only reference to the loaded classifier.
pub type ClassifierHandle = Arc<dyn Classifier>;

#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn read_bytes(&self, name: &str) -> Result<Vec<u8>>;
    async fn write_bytes(&self, name: &str, data: &[u8]) -> Result<()>;
}
