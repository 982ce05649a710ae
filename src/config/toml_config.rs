use crate::core::training::TrainingParams;
use crate::utils::error::{Result, ServiceError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_allow_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    /// Refuse to start without a loadable artifact.
    pub required: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "./models/penguin_classifier.json".to_string(),
            required: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub data_path: String,
    pub folds: usize,
    pub seed: u64,
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let params = TrainingParams::default();
        Self {
            data_path: "./data/penguins_sample.csv".to_string(),
            folds: params.folds,
            seed: params.seed,
            learning_rate: params.learning_rate,
            epochs: params.epochs,
            l2_penalty: params.l2_penalty,
        }
    }
}

impl TrainingConfig {
    pub fn params(&self) -> TrainingParams {
        TrainingParams {
            learning_rate: self.learning_rate,
            epochs: self.epochs,
            l2_penalty: self.l2_penalty,
            folds: self.folds,
            seed: self.seed,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ServiceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ServiceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ServiceError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or(LogFormat::Compact)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;

        validate_path("model.path", &self.model.path)?;
        validate_file_extension("model.path", &self.model.path, &["json"])?;

        if LogFormat::parse(&self.logging.format).is_none() {
            return Err(ServiceError::InvalidConfigValueError {
                field: "logging.format".to_string(),
                value: self.logging.format.clone(),
                reason: "Valid formats: compact, json".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ServiceError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        validate_path("training.data_path", &self.training.data_path)?;
        validate_positive_number("training.folds", self.training.folds, 2)?;
        validate_positive_number("training.epochs", self.training.epochs, 1)?;
        validate_range("training.learning_rate", self.training.learning_rate, 1e-6, 10.0)?;
        validate_range("training.l2_penalty", self.training.l2_penalty, 0.0, 10.0)?;

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
