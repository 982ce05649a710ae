pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{http_client::PredictionClient, storage::LocalStorage};
pub use crate::core::{prediction::predict, validator::validate};
pub use domain::model::{MeasurementRecord, Species};
pub use utils::error::{Result, ServiceError};
