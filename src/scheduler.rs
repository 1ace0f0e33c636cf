//! Fixed-interval trade loop
//!
//! Runs one opportunity check per interval tick until a shutdown signal
//! arrives. Each cycle runs to completion before the next sleep; a cycle
//! that cannot fetch both prices is skipped. The loop body is a standalone
//! method so a single cycle can be driven directly in tests.

use crate::config::{PositionMode, TradingConfig};
use crate::exchange::MarketData;
use crate::execution::{ExecutionEngine, PositionSide, TradeIntent};
use crate::signal::BasisEvaluator;
use crate::telemetry::{increment_counter, set_gauge, CounterMetric, GaugeMetric};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Outcome of a single evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A price fetch failed; no evaluation happened
    Skipped,
    /// Basis within threshold; no order placed
    NoTrade,
    /// Order placed and acknowledged
    Traded,
    /// Order placement failed
    OrderFailed,
}

/// Interval-driven opportunity scheduler
pub struct Scheduler {
    spot_symbol: String,
    futures_symbol: String,
    quantity: Decimal,
    position_mode: PositionMode,
    interval: Duration,
    evaluator: BasisEvaluator,
    market_data: Arc<dyn MarketData>,
    engine: Arc<dyn ExecutionEngine>,
}

impl Scheduler {
    /// Create a scheduler for a resolved futures contract
    pub fn new(
        trading: &TradingConfig,
        futures_symbol: String,
        market_data: Arc<dyn MarketData>,
        engine: Arc<dyn ExecutionEngine>,
    ) -> Self {
        Self {
            spot_symbol: trading.spot_symbol(),
            futures_symbol,
            quantity: trading.quantity,
            position_mode: trading.position_mode,
            interval: Duration::from_secs(trading.poll_interval_secs),
            evaluator: BasisEvaluator::new(trading.basis_threshold),
            market_data,
            engine,
        }
    }

    /// Run cycles until the shutdown channel flips or closes.
    ///
    /// An in-flight cycle finishes before the loop exits; an order request
    /// already submitted is never cancelled from here.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            symbol = %self.futures_symbol,
            interval_secs = self.interval.as_secs(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Shutdown requested, stopping scheduler");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Fetch prices, evaluate the basis, and trade when it is wide enough
    pub async fn run_cycle(&self) -> CycleOutcome {
        let spot = match self.market_data.spot_price(&self.spot_symbol).await {
            Ok(price) => price,
            Err(e) => {
                increment_counter(CounterMetric::PriceFetchErrors);
                tracing::error!(
                    symbol = %self.spot_symbol,
                    error = %e,
                    "Could not fetch spot price, skipping cycle"
                );
                return CycleOutcome::Skipped;
            }
        };

        let futures = match self.market_data.futures_price(&self.futures_symbol).await {
            Ok(price) => price,
            Err(e) => {
                increment_counter(CounterMetric::PriceFetchErrors);
                tracing::error!(
                    symbol = %self.futures_symbol,
                    error = %e,
                    "Could not fetch futures price, skipping cycle"
                );
                return CycleOutcome::Skipped;
            }
        };

        let basis = BasisEvaluator::basis(spot, futures);
        set_gauge(GaugeMetric::SpotPrice, spot.to_f64().unwrap_or(f64::NAN));
        set_gauge(GaugeMetric::FuturesPrice, futures.to_f64().unwrap_or(f64::NAN));
        set_gauge(GaugeMetric::Basis, basis.to_f64().unwrap_or(f64::NAN));
        increment_counter(CounterMetric::CyclesCompleted);

        tracing::info!(
            spot = %spot,
            futures = %futures,
            symbol = %self.futures_symbol,
            basis = %basis,
            "Price check"
        );

        let signal = match self.evaluator.detect(spot, futures) {
            Some(signal) => signal,
            None => return CycleOutcome::NoTrade,
        };

        tracing::info!(
            basis = %signal.basis,
            side = signal.side.as_str(),
            quantity = %self.quantity,
            "Basis beyond threshold, executing trade"
        );

        let intent = TradeIntent::market(
            self.futures_symbol.clone(),
            signal.side,
            self.quantity,
            PositionSide::for_trade(self.position_mode, signal.side),
        );

        increment_counter(CounterMetric::OrdersSubmitted);
        match self.engine.execute(intent).await {
            Ok(ack) => {
                tracing::info!(
                    order_id = ack.order_id,
                    status = %ack.status,
                    "Order acknowledged"
                );
                CycleOutcome::Traded
            }
            Err(e) => {
                tracing::error!(error = %e, "Order placement failed");
                CycleOutcome::OrderFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{ExchangeError, OrderAck};
    use crate::execution::PaperEngine;
    use crate::signal::Side;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct StubMarketData {
        spot: Option<Decimal>,
        futures: Option<Decimal>,
    }

    #[async_trait]
    impl MarketData for StubMarketData {
        async fn spot_price(&self, _symbol: &str) -> Result<Decimal, ExchangeError> {
            self.spot
                .ok_or_else(|| ExchangeError::Malformed("spot unavailable".to_string()))
        }

        async fn futures_price(&self, _symbol: &str) -> Result<Decimal, ExchangeError> {
            self.futures
                .ok_or_else(|| ExchangeError::Malformed("futures unavailable".to_string()))
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl ExecutionEngine for FailingEngine {
        async fn execute(&self, _intent: TradeIntent) -> anyhow::Result<OrderAck> {
            anyhow::bail!("order endpoint unavailable")
        }
    }

    fn trading_config() -> TradingConfig {
        TradingConfig {
            base_asset: "BTC".to_string(),
            quote_asset: "USDT".to_string(),
            quantity: dec!(0.001),
            basis_threshold: dec!(25.0),
            poll_interval_secs: 30,
            position_mode: PositionMode::Oneway,
            symbol: None,
        }
    }

    fn scheduler_with(
        spot: Option<Decimal>,
        futures: Option<Decimal>,
        engine: Arc<dyn ExecutionEngine>,
    ) -> Scheduler {
        Scheduler::new(
            &trading_config(),
            "BTCUSDT_250926".to_string(),
            Arc::new(StubMarketData { spot, futures }),
            engine,
        )
    }

    #[tokio::test]
    async fn test_wide_basis_trades_on_paper() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(100030.00)),
            engine.clone(),
        );

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Traded);

        let fills = engine.fills().await;
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].symbol, "BTCUSDT_250926");
        assert_eq!(fills[0].side, Side::Sell);
        assert_eq!(fills[0].quantity, dec!(0.001));
    }

    #[tokio::test]
    async fn test_narrow_basis_no_trade() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(100010.00)),
            engine.clone(),
        );

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::NoTrade);
        assert!(engine.fills().await.is_empty());
    }

    #[tokio::test]
    async fn test_spot_fetch_failure_skips_cycle() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = scheduler_with(None, Some(dec!(100030.00)), engine.clone());

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Skipped);
        assert!(engine.fills().await.is_empty());
    }

    #[tokio::test]
    async fn test_futures_fetch_failure_skips_cycle() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = scheduler_with(Some(dec!(100000.00)), None, engine.clone());

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Skipped);
        assert!(engine.fills().await.is_empty());
    }

    #[tokio::test]
    async fn test_order_failure_is_reported() {
        let scheduler = scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(100030.00)),
            Arc::new(FailingEngine),
        );

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::OrderFailed);
    }

    #[tokio::test]
    async fn test_negative_basis_buys() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(99960.00)),
            engine.clone(),
        );

        let outcome = scheduler.run_cycle().await;
        assert_eq!(outcome, CycleOutcome::Traded);
        assert_eq!(engine.fills().await[0].side, Side::Buy);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = Arc::new(scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(100010.00)),
            engine,
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(shutdown_rx).await })
        };

        shutdown_tx.send(true).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_stops_when_sender_dropped() {
        let engine = Arc::new(PaperEngine::new());
        let scheduler = Arc::new(scheduler_with(
            Some(dec!(100000.00)),
            Some(dec!(100010.00)),
            engine,
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(shutdown_rx).await })
        };

        drop(shutdown_tx);
        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
