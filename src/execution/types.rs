//! Execution types

use crate::config::PositionMode;
use crate::signal::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price specified)
    Limit,
}

impl OrderType {
    /// Wire representation expected by the order endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

/// Time-in-force for limit orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-till-cancel
    Gtc,
    /// Immediate-or-cancel
    Ioc,
    /// Fill-or-kill
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

/// Position side flag sent with every order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    /// One-way mode
    Both,
    /// Hedge mode, long leg
    Long,
    /// Hedge mode, short leg
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Both => "BOTH",
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }

    /// Position side for a trade under the configured account mode.
    /// One-way accounts always send BOTH; hedge accounts open the
    /// directional leg matching the trade side.
    pub fn for_trade(mode: PositionMode, side: Side) -> Self {
        match mode {
            PositionMode::Oneway => PositionSide::Both,
            PositionMode::Hedge => match side {
                Side::Buy => PositionSide::Long,
                Side::Sell => PositionSide::Short,
            },
        }
    }
}

/// An order to be submitted, consumed immediately by the execution engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Contract symbol
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Order quantity in base asset units
    pub quantity: Decimal,
    /// Order type
    pub order_type: OrderType,
    /// Limit price (limit orders only)
    pub price: Option<Decimal>,
    /// Time-in-force (limit orders only)
    pub time_in_force: Option<TimeInForce>,
    /// Position side flag
    pub position_side: PositionSide,
    /// Client-assigned order ID, fresh per attempt
    pub client_order_id: String,
}

impl TradeIntent {
    /// Build a market order intent
    pub fn market(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        position_side: PositionSide,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            order_type: OrderType::Market,
            price: None,
            time_in_force: None,
            position_side,
            client_order_id: Uuid::new_v4().to_string(),
        }
    }

    /// Build a good-till-cancel limit order intent
    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        position_side: PositionSide,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            order_type: OrderType::Limit,
            price: Some(price),
            time_in_force: Some(TimeInForce::Gtc),
            position_side,
            client_order_id: Uuid::new_v4().to_string(),
        }
    }

    /// Ordered request parameters for the signed order endpoint.
    ///
    /// Insertion order is load-bearing: the signature is computed over the
    /// parameters exactly as serialized here.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.order_type.as_str().to_string()),
            ("quantity", self.quantity.to_string()),
        ];
        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(tif) = self.time_in_force {
            params.push(("timeInForce", tif.as_str().to_string()));
        }
        params.push(("positionSide", self.position_side.as_str().to_string()));
        params.push(("newClientOrderId", self.client_order_id.clone()));
        params
    }
}
