//! Paper trading execution engine

use super::{ExecutionEngine, TradeIntent};
use crate::exchange::OrderAck;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Paper trading engine with simulated acknowledgements
pub struct PaperEngine {
    next_order_id: AtomicU64,
    fills: Arc<RwLock<Vec<TradeIntent>>>,
}

impl PaperEngine {
    /// Create a new paper trading engine
    pub fn new() -> Self {
        Self {
            next_order_id: AtomicU64::new(1),
            fills: Arc::new(RwLock::new(vec![])),
        }
    }

    /// All intents accepted so far
    pub async fn fills(&self) -> Vec<TradeIntent> {
        self.fills.read().await.clone()
    }
}

impl Default for PaperEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionEngine for PaperEngine {
    async fn execute(&self, intent: TradeIntent) -> anyhow::Result<OrderAck> {
        let order_id = self.next_order_id.fetch_add(1, Ordering::Relaxed);

        let ack = OrderAck {
            order_id,
            symbol: intent.symbol.clone(),
            status: "FILLED".to_string(),
            client_order_id: intent.client_order_id.clone(),
        };

        let mut fills = self.fills.write().await;
        fills.push(intent);

        tracing::info!(order_id, "Paper order filled");
        Ok(ack)
    }
}
