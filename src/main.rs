use clap::Parser;
use penguin_api::core::artifact::load_classifier;
use penguin_api::server::{self, AppState};
use penguin_api::utils::error::{ErrorSeverity, ServiceError};
use penguin_api::utils::{logger, validation::Validate};
use penguin_api::{CliConfig, LocalStorage, TomlConfig};

fn exit_with(e: &ServiceError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定檔並套用命令列覆蓋
    let mut config = match TomlConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_to(&mut config);

    logger::init_logger(cli.verbose, Some(config.logging.level.as_str()), config.log_format());
    tracing::info!("Starting penguin-api");
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let (store, name) = LocalStorage::for_file(&config.model.path);
    let model = match load_classifier(&store, &name).await {
        Ok(model) => Some(model),
        Err(e) if config.model.required => exit_with(&e),
        Err(e) => {
            tracing::warn!(
                "⚠️ Model not loaded ({}); /predict will answer 503 until restarted with a model",
                e
            );
            None
        }
    };

    let cors = match server::build_cors(&config.server.cors_allow_origins) {
        Ok(cors) => cors,
        Err(e) => exit_with(&e),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let app = server::router(AppState::new(model), cors);

    if let Err(e) = server::serve(listener, app, server::shutdown_signal()).await {
        exit_with(&e);
    }

    Ok(())
}
