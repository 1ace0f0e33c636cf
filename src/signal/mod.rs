//! Signal generation module
//!
//! Turns spot/futures price pairs into trade signals.

mod basis;

pub use basis::{BasisEvaluator, BasisSignal};

use serde::{Deserialize, Serialize};

/// Trading side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy the futures contract (long the basis)
    Buy,
    /// Sell the futures contract (short the basis)
    Sell,
}

impl Side {
    /// Wire representation expected by the order endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_as_str() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(Side::Sell.as_str(), "SELL");
    }

    #[test]
    fn test_side_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), r#""BUY""#);
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), r#""SELL""#);
    }
}
