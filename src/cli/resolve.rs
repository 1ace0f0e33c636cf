//! Resolve command implementation

use crate::config::Config;
use crate::exchange::ExchangeClient;
use crate::market::select_current_quarterly;
use chrono::{TimeZone, Utc};
use clap::Args;

#[derive(Args, Debug)]
pub struct ResolveArgs {}

impl ResolveArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if let Some(symbol) = &config.trading.symbol {
            println!("{} (pinned in configuration)", symbol);
            return Ok(());
        }

        let client = ExchangeClient::new(config.exchange.clone());
        let instruments = client.exchange_info().await?;
        let contract = select_current_quarterly(
            &instruments,
            &config.trading.base_asset,
            &config.trading.quote_asset,
            Utc::now(),
        )?;

        let delivery = Utc
            .timestamp_millis_opt(contract.delivery_date)
            .single()
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| contract.delivery_date.to_string());

        println!("{} (delivery {})", contract.symbol, delivery);
        Ok(())
    }
}
