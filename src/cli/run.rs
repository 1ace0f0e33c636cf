//! Run command implementation

use crate::config::{Config, Credentials, ExecutionMode};
use crate::exchange::{ExchangeClient, OrderGateway};
use crate::execution::{ExecutionEngine, LiveEngine, PaperEngine};
use crate::market;
use crate::scheduler::Scheduler;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Force paper execution regardless of the configured mode
    #[arg(long)]
    pub paper: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mode = if self.paper {
            ExecutionMode::Paper
        } else {
            config.execution.mode
        };

        // Live trading needs signed requests; paper mode runs without keys.
        let client = Arc::new(match mode {
            ExecutionMode::Live => {
                let credentials =
                    Credentials::from_env().context("live mode requires API credentials")?;
                ExchangeClient::with_credentials(config.exchange.clone(), credentials)
            }
            ExecutionMode::Paper => ExchangeClient::new(config.exchange.clone()),
        });

        let symbol = market::resolve_symbol(&client, &config.trading)
            .await
            .context("could not resolve a futures contract to monitor")?;

        let engine: Arc<dyn ExecutionEngine> = match mode {
            ExecutionMode::Paper => {
                tracing::info!("Execution mode: paper");
                Arc::new(PaperEngine::new())
            }
            ExecutionMode::Live => {
                tracing::info!("Execution mode: live");
                let gateway: Arc<dyn OrderGateway> = client.clone();
                Arc::new(LiveEngine::new(gateway, &config.execution))
            }
        };

        let scheduler = Scheduler::new(&config.trading, symbol.clone(), client.clone(), engine);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received");
                let _ = shutdown_tx.send(true);
            }
        });

        tracing::info!(symbol = %symbol, "Basis bot started, press Ctrl+C to stop");
        scheduler.run(shutdown_rx).await?;
        tracing::info!("Basis bot stopped");
        Ok(())
    }
}
