//! Execution engine module
//!
//! Handles order submission (paper and live modes)

mod live;
mod paper;
mod types;

pub use live::LiveEngine;
pub use paper::PaperEngine;
pub use types::{OrderType, PositionSide, TimeInForce, TradeIntent};

use crate::exchange::OrderAck;
use async_trait::async_trait;

/// Trait for execution engine implementations
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Execute a trade intent, returning the exchange acknowledgement
    async fn execute(&self, intent: TradeIntent) -> anyhow::Result<OrderAck>;
}
