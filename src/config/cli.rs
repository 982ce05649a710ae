use crate::config::toml_config::TomlConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "penguin-api")]
#[command(about = "Serve penguin species predictions over HTTP")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "penguin-api.toml")]
    pub config: String,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Model artifact to load at startup
    #[arg(long)]
    pub model: Option<String>,

    /// Start even if the model artifact cannot be loaded
    #[arg(long)]
    pub allow_missing_model: bool,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if self.allow_missing_model {
            config.model.required = false;
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
    }
}
