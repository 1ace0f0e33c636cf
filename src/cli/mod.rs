//! CLI interface for basis-bot
//!
//! Provides subcommands for:
//! - `run`: Start the trade loop
//! - `resolve`: One-shot quarterly contract resolution
//! - `status`: Show current state
//! - `config`: Show configuration

mod resolve;
mod run;

pub use resolve::ResolveArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "basis-bot")]
#[command(about = "Cash-and-carry basis trading bot for quarterly crypto futures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the trade loop
    Run(RunArgs),
    /// Resolve the current quarterly contract and exit
    Resolve(ResolveArgs),
    /// Show current state
    Status,
    /// Show configuration
    Config,
}
