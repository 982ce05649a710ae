use clap::Parser;
use penguin_api::core::artifact::save_model;
use penguin_api::core::dataset::load_dataset_from_path;
use penguin_api::core::training;
use penguin_api::utils::{logger, validation::Validate};
use penguin_api::{LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "train_model")]
#[command(about = "Fit the penguin classifier and write the model artifact")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "penguin-api.toml")]
    config: String,

    /// Training CSV (overrides [training].data_path)
    #[arg(long)]
    data: Option<String>,

    /// Artifact output path (overrides [model].path)
    #[arg(short, long)]
    output: Option<String>,

    /// Number of cross-validation folds
    #[arg(long)]
    folds: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Report cross-validation only, do not write the artifact
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let mut config = match TomlConfig::from_file_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(data) = args.data {
        config.training.data_path = data;
    }
    if let Some(output) = args.output {
        config.model.path = output;
    }
    if let Some(folds) = args.folds {
        config.training.folds = folds;
    }
    if let Some(seed) = args.seed {
        config.training.seed = seed;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let samples = load_dataset_from_path(&config.training.data_path)?;
    let params = config.training.params();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - artifact will not be written");
        let cv = training::cross_validate(&samples, &params)?;
        for (i, accuracy) in cv.fold_accuracies.iter().enumerate() {
            println!("fold {}: {:.3}", i + 1, accuracy);
        }
        println!("mean accuracy: {:.3}", cv.mean_accuracy);
        return Ok(());
    }

    let model = match training::train(&samples, &params) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("❌ Training failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let (store, name) = LocalStorage::for_file(&config.model.path);
    save_model(&store, &name, &model).await?;

    println!("✅ Model trained on {} samples", model.n_samples);
    if let Some(accuracy) = model.cv_accuracy {
        println!("📊 Cross-validation accuracy: {:.3}", accuracy);
    }
    println!("📁 Artifact saved to: {}", config.model.path);

    Ok(())
}
