use clap::{Parser, Subcommand};
use penguin_api::utils::logger;
use penguin_api::PredictionClient;

#[derive(Parser)]
#[command(name = "predict_client")]
#[command(about = "Query a running penguin-api server")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the server and whether a model is loaded
    Health,
    /// Ask for a random species
    Guess,
    /// Predict the species for one penguin
    Predict {
        #[arg(long)]
        bill_length_mm: f64,
        #[arg(long)]
        bill_depth_mm: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let client = PredictionClient::new(&args.base_url)?;

    let result = match args.command {
        Command::Health => client.health().await.map(|health| {
            format!(
                "status: {}, model loaded: {}",
                health.status, health.model_loaded
            )
        }),
        Command::Guess => client.guess().await.map(|species| format!("🎲 {}", species)),
        Command::Predict {
            bill_length_mm,
            bill_depth_mm,
        } => client
            .predict(bill_length_mm, bill_depth_mm)
            .await
            .map(|species| format!("🐧 {}", species)),
    };

    match result {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
