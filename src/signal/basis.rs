//! Basis opportunity detection
//!
//! Basis = futures price - spot price for the same underlying. A futures
//! price persistently above spot by more than the threshold is treated as a
//! convergence opportunity as delivery approaches: sell futures when the
//! basis exceeds +threshold, buy when it drops below -threshold.

use super::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A detected basis opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisSignal {
    /// Spot price at evaluation time
    pub spot: Decimal,
    /// Futures price at evaluation time
    pub futures: Decimal,
    /// futures - spot
    pub basis: Decimal,
    /// Trade direction
    pub side: Side,
    /// Evaluation timestamp
    pub timestamp: DateTime<Utc>,
}

/// Threshold-based basis detector
#[derive(Debug, Clone)]
pub struct BasisEvaluator {
    threshold: Decimal,
}

impl BasisEvaluator {
    /// Create an evaluator with the given trigger threshold (quote units)
    pub fn new(threshold: Decimal) -> Self {
        Self { threshold }
    }

    /// Basis for a spot/futures price pair
    pub fn basis(spot: Decimal, futures: Decimal) -> Decimal {
        futures - spot
    }

    /// Evaluate a price pair. Returns a signal when the basis magnitude
    /// exceeds the threshold, none otherwise (threshold equality holds).
    pub fn detect(&self, spot: Decimal, futures: Decimal) -> Option<BasisSignal> {
        let basis = Self::basis(spot, futures);

        let side = if basis > self.threshold {
            Side::Sell
        } else if basis < -self.threshold {
            Side::Buy
        } else {
            tracing::debug!(
                spot = %spot,
                futures = %futures,
                basis = %basis,
                threshold = %self.threshold,
                "Basis within threshold"
            );
            return None;
        };

        Some(BasisSignal {
            spot,
            futures,
            basis,
            side,
            timestamp: Utc::now(),
        })
    }
}
