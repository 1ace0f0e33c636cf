//! Exchange wire types and error taxonomy

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Contract type value for dated quarterly futures
pub const CONTRACT_TYPE_QUARTERLY: &str = "QUARTERLY";
/// Instrument status value for tradable contracts
pub const STATUS_TRADING: &str = "TRADING";

/// Exchange info response envelope
#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    /// All listed instruments
    pub symbols: Vec<Instrument>,
}

/// A single instrument from the exchange metadata endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Contract symbol (e.g., "BTCUSDT_250926")
    pub symbol: String,
    /// Base asset (e.g., "BTC")
    pub base_asset: String,
    /// Quote asset (e.g., "USDT")
    pub quote_asset: String,
    /// Contract type (e.g., "QUARTERLY", "PERPETUAL")
    #[serde(default)]
    pub contract_type: String,
    /// Trading status (e.g., "TRADING", "SETTLING")
    #[serde(default)]
    pub status: String,
    /// Delivery date in epoch milliseconds (0 for perpetuals)
    #[serde(default)]
    pub delivery_date: i64,
}

/// Ticker price response: `{"symbol": "...", "price": "<decimal string>"}`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

impl TickerPrice {
    /// Parse the price string into a decimal
    pub fn parse_price(&self) -> Result<Decimal, ExchangeError> {
        Decimal::from_str(&self.price)
            .map_err(|_| ExchangeError::Malformed(format!("unparseable price: {}", self.price)))
    }
}

/// Order confirmation returned by the order endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    /// Exchange-assigned order ID
    pub order_id: u64,
    /// Contract symbol
    pub symbol: String,
    /// Order status (e.g., "NEW", "FILLED")
    pub status: String,
    /// Client order ID echoed back
    #[serde(default)]
    pub client_order_id: String,
}

/// Error body returned by the exchange on rejected requests
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Errors from exchange interactions
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport failure: connect error, timeout, or body read failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The exchange returned a structured rejection body
    #[error("exchange rejected request (code {code}): {msg}")]
    Rejected { status: u16, code: i64, msg: String },

    /// Non-2xx response without a parseable rejection body
    #[error("unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response with a body that does not match the expected shape
    #[error("malformed response body: {0}")]
    Malformed(String),

    /// Signed endpoint called without credentials
    #[error("order endpoint requires API credentials")]
    MissingCredentials,
}

impl ExchangeError {
    /// True for transport-level failures where the server-side outcome of the
    /// request is unknown (the request may still have been processed).
    pub fn is_transport(&self) -> bool {
        matches!(self, ExchangeError::Transport(_))
    }
}
