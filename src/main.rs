use anyhow::Context;
use basis_bot::cli::{Cli, Commands};
use basis_bot::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)
        .with_context(|| format!("Could not load config from {}", cli.config))?;

    // Initialize telemetry
    let _telemetry = basis_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            args.execute(&config).await?;
        }
        Commands::Resolve(args) => {
            args.execute(&config).await?;
        }
        Commands::Status => {
            println!("basis-bot status");
            println!("  Execution: {:?}", config.execution.mode);
            println!("  Status: Not running");
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Pair: {}/{}",
                config.trading.base_asset, config.trading.quote_asset
            );
            println!("  Quantity: {}", config.trading.quantity);
            println!("  Basis threshold: {}", config.trading.basis_threshold);
            println!("  Poll interval: {}s", config.trading.poll_interval_secs);
            println!("  Execution: {:?}", config.execution.mode);
        }
    }

    Ok(())
}
