pub mod artifact;
pub mod dataset;
pub mod guess;
pub mod prediction;
pub mod training;
pub mod validator;

pub use crate::domain::model::{FeatureFrame, MeasurementRecord, Species};
pub use crate::domain::ports::{Classifier, ClassifierHandle, ModelStore};
pub use crate::utils::error::Result;
