//! Live execution engine
//!
//! Submits a market order for the full quantity. When the exchange rejects
//! it, falls back to walking a good-till-cancel limit order across a bounded
//! price band around the current futures price until one is accepted or the
//! band is exhausted.

use super::{ExecutionEngine, TradeIntent};
use crate::config::ExecutionConfig;
use crate::exchange::{ExchangeError, OrderAck, OrderGateway};
use crate::signal::Side;
use crate::telemetry::{increment_counter, CounterMetric};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Rejection code: limit price above the allowed cap
const PRICE_ABOVE_CAP: i64 = -4016;
/// Rejection code: limit price below the allowed floor
const PRICE_BELOW_FLOOR: i64 = -4017;
/// Message prefix used by gateways that return a generic rejection code
const PRICE_BAND_MSG_PREFIX: &str = "Limit price can't be";

/// Quote price granularity for fallback limit prices
const PRICE_TICK_DP: u32 = 2;

/// Live execution engine over a signed order gateway
pub struct LiveEngine {
    gateway: Arc<dyn OrderGateway>,
    band_pct: Decimal,
    step_pct: Decimal,
}

impl LiveEngine {
    /// Create a live engine with the configured fallback band and step
    pub fn new(gateway: Arc<dyn OrderGateway>, config: &ExecutionConfig) -> Self {
        Self {
            gateway,
            band_pct: config.limit_band_pct,
            step_pct: config.limit_step_pct,
        }
    }

    /// Walk a limit order across the allowed price band.
    ///
    /// The walk starts at the band extreme favorable to a quick fill (max
    /// for BUY, min for SELL) and steps toward the opposite boundary on
    /// every price-band rejection. Any other rejection aborts the walk.
    /// The multiplicative step bounds the iteration count by the band
    /// width; progress is forced to at least one tick so rounding cannot
    /// stall the walk.
    async fn limit_fallback(&self, intent: &TradeIntent) -> anyhow::Result<OrderAck> {
        let pivot = self.gateway.futures_price(&intent.symbol).await?;
        let band_max = (pivot * (Decimal::ONE + self.band_pct)).round_dp(PRICE_TICK_DP);
        let band_min = (pivot * (Decimal::ONE - self.band_pct)).round_dp(PRICE_TICK_DP);

        let (mut price, step_factor) = match intent.side {
            Side::Buy => (band_max, Decimal::ONE - self.step_pct),
            Side::Sell => (band_min, Decimal::ONE + self.step_pct),
        };

        tracing::info!(
            symbol = %intent.symbol,
            side = intent.side.as_str(),
            pivot = %pivot,
            band_min = %band_min,
            band_max = %band_max,
            "Starting limit order fallback"
        );

        loop {
            let within_band = match intent.side {
                Side::Buy => price >= band_min,
                Side::Sell => price <= band_max,
            };
            if !within_band {
                tracing::error!(
                    symbol = %intent.symbol,
                    side = intent.side.as_str(),
                    "Limit fallback exhausted the allowed price band"
                );
                anyhow::bail!(
                    "limit fallback exhausted for {} {} (band {}..{})",
                    intent.side.as_str(),
                    intent.symbol,
                    band_min,
                    band_max
                );
            }

            let limit = TradeIntent::limit(
                intent.symbol.clone(),
                intent.side,
                intent.quantity,
                price,
                intent.position_side,
            );

            match self.gateway.submit_order(&limit.to_params()).await {
                Ok(ack) => {
                    tracing::info!(
                        order_id = ack.order_id,
                        price = %price,
                        "Limit order accepted"
                    );
                    return Ok(ack);
                }
                Err(e) if is_price_band_rejection(&e) => {
                    increment_counter(CounterMetric::LimitRetries);
                    tracing::info!(
                        price = %price,
                        error = %e,
                        "Limit price outside allowed range, stepping"
                    );
                    let next = (price * step_factor).round_dp(PRICE_TICK_DP);
                    price = if next == price {
                        let tick = Decimal::new(1, PRICE_TICK_DP);
                        match intent.side {
                            Side::Buy => price - tick,
                            Side::Sell => price + tick,
                        }
                    } else {
                        next
                    };
                }
                Err(e) => {
                    tracing::error!(error = %e, "Limit order failed, aborting fallback");
                    return Err(e.into());
                }
            }
        }
    }
}

/// Whether a rejection identifies a limit price outside the allowed range.
/// Structured code match first; message prefix covers gateways that return
/// a generic code.
fn is_price_band_rejection(err: &ExchangeError) -> bool {
    match err {
        ExchangeError::Rejected { code, msg, .. } => {
            *code == PRICE_ABOVE_CAP
                || *code == PRICE_BELOW_FLOOR
                || msg.starts_with(PRICE_BAND_MSG_PREFIX)
        }
        _ => false,
    }
}

#[async_trait]
impl ExecutionEngine for LiveEngine {
    async fn execute(&self, intent: TradeIntent) -> anyhow::Result<OrderAck> {
        tracing::info!(
            symbol = %intent.symbol,
            side = intent.side.as_str(),
            quantity = %intent.quantity,
            "Submitting market order"
        );

        match self.gateway.submit_order(&intent.to_params()).await {
            Ok(ack) => {
                tracing::info!(order_id = ack.order_id, status = %ack.status, "Market order accepted");
                Ok(ack)
            }
            Err(e @ (ExchangeError::Rejected { .. } | ExchangeError::Status { .. })) => {
                increment_counter(CounterMetric::OrdersRejected);
                tracing::warn!(error = %e, "Market order rejected, entering limit fallback");
                self.limit_fallback(&intent).await
            }
            Err(e) => {
                // A timeout here leaves the server-side outcome unknown; a
                // blind retry could double-fill, so the error propagates.
                tracing::error!(
                    error = %e,
                    "Market order failed with unknown outcome, not retrying"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::MarketData;
    use crate::execution::PositionSide;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Gateway stub that replays scripted responses, then rejects on price
    /// band forever once the script is exhausted.
    struct ScriptedGateway {
        pivot: Decimal,
        responses: Mutex<VecDeque<Result<OrderAck, ExchangeError>>>,
        submitted: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedGateway {
        fn new(pivot: Decimal, responses: Vec<Result<OrderAck, ExchangeError>>) -> Self {
            Self {
                pivot,
                responses: Mutex::new(responses.into()),
                submitted: Mutex::new(vec![]),
            }
        }

        fn submissions(&self) -> Vec<Vec<(String, String)>> {
            self.submitted.lock().unwrap().clone()
        }

        fn submitted_prices(&self) -> Vec<Decimal> {
            self.submissions()
                .iter()
                .filter_map(|params| {
                    params
                        .iter()
                        .find(|(k, _)| k == "price")
                        .map(|(_, v)| v.parse().unwrap())
                })
                .collect()
        }
    }

    fn ack(order_id: u64) -> OrderAck {
        OrderAck {
            order_id,
            symbol: "BTCUSDT_250926".to_string(),
            status: "NEW".to_string(),
            client_order_id: String::new(),
        }
    }

    fn band_rejection() -> ExchangeError {
        ExchangeError::Rejected {
            status: 400,
            code: PRICE_ABOVE_CAP,
            msg: "Limit price can't be higher than 100400.00".to_string(),
        }
    }

    fn other_rejection() -> ExchangeError {
        ExchangeError::Rejected {
            status: 400,
            code: -2019,
            msg: "Margin is insufficient".to_string(),
        }
    }

    #[async_trait]
    impl MarketData for ScriptedGateway {
        async fn spot_price(&self, _symbol: &str) -> Result<Decimal, ExchangeError> {
            Ok(self.pivot)
        }

        async fn futures_price(&self, _symbol: &str) -> Result<Decimal, ExchangeError> {
            Ok(self.pivot)
        }
    }

    #[async_trait]
    impl OrderGateway for ScriptedGateway {
        async fn submit_order(&self, params: &[(&str, String)]) -> Result<OrderAck, ExchangeError> {
            self.submitted.lock().unwrap().push(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            );
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(band_rejection()))
        }
    }

    fn engine(gateway: Arc<ScriptedGateway>) -> LiveEngine {
        LiveEngine::new(gateway, &ExecutionConfig::default())
    }

    fn market_intent(side: Side) -> TradeIntent {
        TradeIntent::market("BTCUSDT_250926", side, dec!(0.001), PositionSide::Both)
    }

    #[tokio::test]
    async fn test_market_order_success_no_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100000), vec![Ok(ack(1))]));
        let result = engine(gateway.clone()).execute(market_intent(Side::Sell)).await;

        assert!(result.is_ok());
        let submissions = gateway.submissions();
        assert_eq!(submissions.len(), 1);
        let order_type = submissions[0].iter().find(|(k, _)| k == "type").unwrap();
        assert_eq!(order_type.1, "MARKET");
    }

    #[tokio::test]
    async fn test_rejected_market_falls_back_to_band_extreme() {
        let gateway = Arc::new(ScriptedGateway::new(
            dec!(100000),
            vec![Err(other_rejection()), Ok(ack(2))],
        ));
        let result = engine(gateway.clone()).execute(market_intent(Side::Buy)).await;

        assert!(result.is_ok());
        let prices = gateway.submitted_prices();
        // BUY starts at the band maximum: 100000 * 1.005
        assert_eq!(prices, vec![dec!(100500.00)]);
        let submissions = gateway.submissions();
        assert_eq!(submissions.len(), 2);
        let tif = submissions[1].iter().find(|(k, _)| k == "timeInForce").unwrap();
        assert_eq!(tif.1, "GTC");
    }

    #[tokio::test]
    async fn test_sell_fallback_starts_at_band_minimum() {
        let gateway = Arc::new(ScriptedGateway::new(
            dec!(100000),
            vec![Err(other_rejection()), Ok(ack(2))],
        ));
        let result = engine(gateway.clone()).execute(market_intent(Side::Sell)).await;

        assert!(result.is_ok());
        // SELL starts at the band minimum: 100000 * 0.995
        assert_eq!(gateway.submitted_prices(), vec![dec!(99500.00)]);
    }

    #[tokio::test]
    async fn test_buy_walk_steps_down_until_accepted() {
        let gateway = Arc::new(ScriptedGateway::new(
            dec!(100000),
            vec![
                Err(other_rejection()),
                Err(band_rejection()),
                Err(band_rejection()),
                Ok(ack(4)),
            ],
        ));
        let result = engine(gateway.clone()).execute(market_intent(Side::Buy)).await;

        assert!(result.is_ok());
        let prices = gateway.submitted_prices();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0], dec!(100500.00));
        // Each rejection steps 0.1% toward the opposite boundary
        assert!(prices[1] < prices[0]);
        assert!(prices[2] < prices[1]);
    }

    #[tokio::test]
    async fn test_exhausted_band_terminates_with_error() {
        // Script is empty: every submission is a price-band rejection.
        let gateway = Arc::new(ScriptedGateway::new(dec!(100000), vec![]));
        let result = engine(gateway.clone()).execute(market_intent(Side::Buy)).await;

        assert!(result.is_err());
        let prices = gateway.submitted_prices();
        // Band is 1% wide and the step 0.1%, so the walk is bounded
        assert!(prices.len() >= 5, "walked {} prices", prices.len());
        assert!(prices.len() <= 20, "walked {} prices", prices.len());
        // Monotonic toward the lower boundary, never below it
        for pair in prices.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert!(*prices.last().unwrap() >= dec!(99500.00));
    }

    #[tokio::test]
    async fn test_sell_walk_steps_up() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100000), vec![]));
        let result = engine(gateway.clone()).execute(market_intent(Side::Sell)).await;

        assert!(result.is_err());
        let prices = gateway.submitted_prices();
        assert_eq!(prices[0], dec!(99500.00));
        for pair in prices.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(*prices.last().unwrap() <= dec!(100500.00));
    }

    #[tokio::test]
    async fn test_other_rejection_aborts_fallback() {
        let gateway = Arc::new(ScriptedGateway::new(
            dec!(100000),
            vec![
                Err(other_rejection()),
                Err(band_rejection()),
                Err(other_rejection()),
            ],
        ));
        let result = engine(gateway.clone()).execute(market_intent(Side::Buy)).await;

        assert!(result.is_err());
        // market + first limit + aborting limit, nothing after
        assert_eq!(gateway.submissions().len(), 3);
    }

    #[tokio::test]
    async fn test_ambiguous_market_failure_does_not_fall_back() {
        let gateway = Arc::new(ScriptedGateway::new(
            dec!(100000),
            vec![Err(ExchangeError::Malformed("truncated body".to_string()))],
        ));
        let result = engine(gateway.clone()).execute(market_intent(Side::Buy)).await;

        assert!(result.is_err());
        assert_eq!(gateway.submissions().len(), 1);
    }

    #[test]
    fn test_price_band_rejection_classification() {
        assert!(is_price_band_rejection(&band_rejection()));
        assert!(is_price_band_rejection(&ExchangeError::Rejected {
            status: 400,
            code: PRICE_BELOW_FLOOR,
            msg: "Limit price can't be lower than 99600.00".to_string(),
        }));
        // Generic code, recognizable message
        assert!(is_price_band_rejection(&ExchangeError::Rejected {
            status: 400,
            code: -1,
            msg: "Limit price can't be higher than 100400.00".to_string(),
        }));
        assert!(!is_price_band_rejection(&other_rejection()));
        assert!(!is_price_band_rejection(&ExchangeError::Malformed(
            "x".to_string()
        )));
    }
}
