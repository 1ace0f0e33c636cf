//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Completed evaluation cycles
    CyclesCompleted,
    /// Price fetches that failed (cycle skipped)
    PriceFetchErrors,
    /// Orders submitted to the exchange
    OrdersSubmitted,
    /// Orders the exchange rejected
    OrdersRejected,
    /// Limit prices re-tried during the fallback walk
    LimitRetries,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::CyclesCompleted => "basisbot_cycles_completed_total",
            CounterMetric::PriceFetchErrors => "basisbot_price_fetch_errors_total",
            CounterMetric::OrdersSubmitted => "basisbot_orders_submitted_total",
            CounterMetric::OrdersRejected => "basisbot_orders_rejected_total",
            CounterMetric::LimitRetries => "basisbot_limit_retries_total",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Last observed spot price
    SpotPrice,
    /// Last observed futures price
    FuturesPrice,
    /// Last computed basis
    Basis,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::SpotPrice => "basisbot_spot_price",
            GaugeMetric::FuturesPrice => "basisbot_futures_price",
            GaugeMetric::Basis => "basisbot_basis",
        }
    }
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Start the Prometheus exporter on the given port
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(port, "Prometheus exporter listening");
    Ok(())
}
