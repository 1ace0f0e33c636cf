//! REST client for the exchange's public and signed endpoints

use super::sign::RequestSigner;
use super::types::{ApiErrorBody, ExchangeError, ExchangeInfo, Instrument, OrderAck, TickerPrice};
use super::{MarketData, OrderGateway};
use crate::config::{Credentials, ExchangeConfig};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;

/// Instrument metadata endpoint (public)
const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
/// Futures ticker endpoint (public)
const FUTURES_TICKER_PATH: &str = "/fapi/v1/ticker/price";
/// Spot ticker endpoint (public)
const SPOT_TICKER_PATH: &str = "/api/v3/ticker/price";
/// Order endpoint (signed)
const ORDER_PATH: &str = "/fapi/v1/order";
/// Header carrying the API key on signed requests
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// HTTP client for exchange endpoints. Public endpoints work without
/// credentials; the order endpoint requires them.
pub struct ExchangeClient {
    config: ExchangeConfig,
    http: Client,
    credentials: Option<Credentials>,
    signer: Option<RequestSigner>,
}

impl ExchangeClient {
    /// Create a client for public endpoints only
    pub fn new(config: ExchangeConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a client that can also submit signed orders
    pub fn with_credentials(config: ExchangeConfig, credentials: Credentials) -> Self {
        Self::build(config, Some(credentials))
    }

    fn build(config: ExchangeConfig, credentials: Option<Credentials>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let signer = credentials
            .as_ref()
            .map(|c| RequestSigner::new(c.api_secret.clone()));

        Self {
            config,
            http,
            credentials,
            signer,
        }
    }

    /// Fetch the full instrument list from the metadata endpoint
    pub async fn exchange_info(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let url = format!("{}{}", self.config.futures_base_url, EXCHANGE_INFO_PATH);

        tracing::debug!(url = %url, "Fetching exchange info");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status.as_u16(), body));
        }

        let info: ExchangeInfo = response
            .json()
            .await
            .map_err(|e| ExchangeError::Malformed(e.to_string()))?;

        Ok(info.symbols)
    }

    async fn fetch_price(
        &self,
        base_url: &str,
        path: &str,
        symbol: &str,
    ) -> Result<Decimal, ExchangeError> {
        let url = format!("{}{}", base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status.as_u16(), body));
        }

        let ticker: TickerPrice = response
            .json()
            .await
            .map_err(|e| ExchangeError::Malformed(e.to_string()))?;

        ticker.parse_price()
    }
}

/// Map a non-2xx response to a structured rejection where the body allows it
fn classify_rejection(status: u16, body: String) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(api) => ExchangeError::Rejected {
            status,
            code: api.code,
            msg: api.msg,
        },
        Err(_) => ExchangeError::Status { status, body },
    }
}

#[async_trait]
impl MarketData for ExchangeClient {
    async fn spot_price(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        self.fetch_price(&self.config.spot_base_url, SPOT_TICKER_PATH, symbol)
            .await
    }

    async fn futures_price(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        self.fetch_price(&self.config.futures_base_url, FUTURES_TICKER_PATH, symbol)
            .await
    }
}

#[async_trait]
impl OrderGateway for ExchangeClient {
    async fn submit_order(&self, params: &[(&str, String)]) -> Result<OrderAck, ExchangeError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ExchangeError::MissingCredentials)?;
        let signer = self.signer.as_ref().ok_or(ExchangeError::MissingCredentials)?;

        // recvWindow joins the signed parameter set; timestamp and signature
        // are appended by the signer. The signed string is sent verbatim.
        let mut full: Vec<(&str, String)> = params.to_vec();
        full.push(("recvWindow", self.config.recv_window_ms.to_string()));
        let query = signer.signed_query(&full);

        let url = format!("{}{}?{}", self.config.futures_base_url, ORDER_PATH, query);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ExchangeError::Malformed(e.to_string()))
    }
}
