//! HMAC-SHA256 request signing for the private order endpoint
//!
//! The exchange validates the signature against the exact byte string sent,
//! so parameters are serialized in insertion order and the signed string is
//! used verbatim as the request query.

use crate::config::ApiSecret;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs ordered request parameters with a keyed hash
pub struct RequestSigner {
    api_secret: ApiSecret,
}

impl RequestSigner {
    /// Create a signer over the given secret
    pub fn new(api_secret: ApiSecret) -> Self {
        Self { api_secret }
    }

    /// Serialize parameters in order, append the current timestamp, and
    /// append the signature over the exact serialized string.
    pub fn signed_query(&self, params: &[(&str, String)]) -> String {
        self.signed_query_at(params, chrono::Utc::now().timestamp_millis())
    }

    /// Deterministic variant with an injected timestamp
    pub fn signed_query_at(&self, params: &[(&str, String)], timestamp_ms: i64) -> String {
        let mut query = String::new();
        for (key, value) in params {
            query.push_str(key);
            query.push('=');
            query.push_str(value);
            query.push('&');
        }
        query.push_str("timestamp=");
        query.push_str(&timestamp_ms.to_string());

        let signature = self.sign(&query);
        query.push_str("&signature=");
        query.push_str(&signature);
        query
    }

    /// Hex-encoded HMAC-SHA256 over the payload bytes
    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.expose().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
