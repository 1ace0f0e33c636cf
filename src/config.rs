//! Configuration types for basis-bot

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    pub trading: TradingConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Exchange endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Base URL for the futures REST API
    #[serde(default = "default_futures_base_url")]
    pub futures_base_url: String,

    /// Base URL for the spot REST API
    #[serde(default = "default_spot_base_url")]
    pub spot_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Receive window sent with signed requests (milliseconds)
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
}

fn default_futures_base_url() -> String {
    "https://fapi.binance.com".to_string()
}
fn default_spot_base_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_request_timeout_secs() -> u64 {
    5
}
fn default_recv_window_ms() -> u64 {
    5000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            futures_base_url: default_futures_base_url(),
            spot_base_url: default_spot_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            recv_window_ms: default_recv_window_ms(),
        }
    }
}

/// Trading parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Base asset of the monitored pair (e.g., "BTC")
    pub base_asset: String,

    /// Quote asset of the monitored pair (e.g., "USDT")
    pub quote_asset: String,

    /// Fixed order quantity in base asset units
    pub quantity: Decimal,

    /// Basis (futures - spot) magnitude that triggers a trade, in quote units
    pub basis_threshold: Decimal,

    /// Seconds between opportunity checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Position side mode sent with orders
    #[serde(default)]
    pub position_mode: PositionMode,

    /// Pin the futures contract symbol instead of resolving the nearest
    /// quarterly contract at startup
    #[serde(default)]
    pub symbol: Option<String>,
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl TradingConfig {
    /// Spot ticker symbol for the configured pair (e.g., "BTCUSDT")
    pub fn spot_symbol(&self) -> String {
        format!("{}{}", self.base_asset, self.quote_asset)
    }
}

/// Position side mode: one-way or hedge account
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    #[default]
    Oneway,
    Hedge,
}

/// Execution engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Execution mode
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Half-width of the limit fallback price band around the pivot
    #[serde(default = "default_limit_band_pct")]
    pub limit_band_pct: Decimal,

    /// Step applied per rejected limit price while walking the band
    #[serde(default = "default_limit_step_pct")]
    pub limit_step_pct: Decimal,
}

fn default_limit_band_pct() -> Decimal {
    Decimal::new(5, 3) // 0.005 = 0.5%
}
fn default_limit_step_pct() -> Decimal {
    Decimal::new(1, 3) // 0.001 = 0.1%
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            limit_band_pct: default_limit_band_pct(),
            limit_step_pct: default_limit_step_pct(),
        }
    }
}

/// Execution mode: paper trading or live
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Paper,
    Live,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Append every log record to this file as well as stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// API secret held in process memory only. `Debug` is intentionally
/// redacted; the raw value is reachable only via `expose`.
#[derive(Clone)]
pub struct ApiSecret(String);

impl ApiSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes for signing
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

/// Exchange API credentials, sourced from the environment at startup
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: ApiSecret,
}

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

impl Credentials {
    /// Read credentials from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| anyhow::anyhow!("{} is not set", API_KEY_ENV))?;
        let api_secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| anyhow::anyhow!("{} is not set", API_SECRET_ENV))?;

        Ok(Self {
            api_key,
            api_secret: ApiSecret::new(api_secret),
        })
    }
}
