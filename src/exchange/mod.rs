//! Exchange access module
//!
//! REST clients for the public ticker/metadata endpoints and the signed
//! order endpoint, plus the traits the rest of the bot programs against.

mod client;
mod sign;
mod types;

pub use client::ExchangeClient;
pub use sign::RequestSigner;
pub use types::{
    ApiErrorBody, ExchangeError, ExchangeInfo, Instrument, OrderAck, TickerPrice,
    CONTRACT_TYPE_QUARTERLY, STATUS_TRADING,
};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for price lookups against the quote endpoints
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current spot price for a symbol
    async fn spot_price(&self, symbol: &str) -> Result<Decimal, ExchangeError>;
    /// Current futures price for a contract symbol
    async fn futures_price(&self, symbol: &str) -> Result<Decimal, ExchangeError>;
}

/// Trait for the signed order endpoint
///
/// Parameters are submitted in insertion order; the implementation appends
/// receive window, timestamp, and signature.
#[async_trait]
pub trait OrderGateway: MarketData {
    /// Submit a signed order from ordered request parameters
    async fn submit_order(&self, params: &[(&str, String)]) -> Result<OrderAck, ExchangeError>;
}
