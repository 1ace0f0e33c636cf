//! Quarterly contract resolution
//!
//! Selects the "current" quarterly futures contract for a base/quote pair:
//! the tradable quarterly instrument whose delivery date is closest in the
//! future.

use crate::config::TradingConfig;
use crate::exchange::{
    ExchangeClient, ExchangeError, Instrument, CONTRACT_TYPE_QUARTERLY, STATUS_TRADING,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Symbol resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The instrument list could not be fetched
    #[error("could not fetch exchange info: {0}")]
    Exchange(#[from] ExchangeError),

    /// The list held no tradable quarterly contract with a future delivery
    #[error("no tradable quarterly contract for {base}{quote} with a future delivery date")]
    NoEligibleContract { base: String, quote: String },
}

/// Select the nearest-delivery quarterly contract from an instrument list.
///
/// Survivors match base/quote assets, are QUARTERLY, TRADING, and deliver
/// strictly after `now`. Among survivors the minimum delivery date wins;
/// equal delivery dates keep the first in list order.
pub fn select_current_quarterly<'a>(
    instruments: &'a [Instrument],
    base: &str,
    quote: &str,
    now: DateTime<Utc>,
) -> Result<&'a Instrument, ResolveError> {
    let now_ms = now.timestamp_millis();

    let mut current: Option<&Instrument> = None;
    for inst in instruments {
        if inst.base_asset != base
            || inst.quote_asset != quote
            || inst.contract_type != CONTRACT_TYPE_QUARTERLY
            || inst.status != STATUS_TRADING
            || inst.delivery_date <= now_ms
        {
            continue;
        }
        match current {
            Some(best) if inst.delivery_date >= best.delivery_date => {}
            _ => current = Some(inst),
        }
    }

    current.ok_or_else(|| ResolveError::NoEligibleContract {
        base: base.to_string(),
        quote: quote.to_string(),
    })
}

/// Resolve the futures symbol to monitor.
///
/// A configured `symbol` pins the contract and skips discovery entirely;
/// otherwise the instrument list is fetched and the current quarterly
/// contract selected.
pub async fn resolve_symbol(
    client: &ExchangeClient,
    trading: &TradingConfig,
) -> Result<String, ResolveError> {
    if let Some(symbol) = &trading.symbol {
        tracing::info!(symbol = %symbol, "Using pinned futures contract symbol");
        return Ok(symbol.clone());
    }

    tracing::info!(
        base = %trading.base_asset,
        quote = %trading.quote_asset,
        "Discovering current quarterly futures contract"
    );

    let instruments = client.exchange_info().await?;
    let contract = select_current_quarterly(
        &instruments,
        &trading.base_asset,
        &trading.quote_asset,
        Utc::now(),
    )?;

    tracing::info!(
        symbol = %contract.symbol,
        delivery_date = contract.delivery_date,
        "Resolved current quarterly contract"
    );

    Ok(contract.symbol.clone())
}
