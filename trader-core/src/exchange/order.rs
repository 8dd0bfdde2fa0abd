//! Order types

use serde::{Deserialize, Serialize};

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order, requires a price
    Limit,
    /// Market order
    Market,
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-til-canceled
    #[default]
    Gtc,
    /// Immediate-or-cancel
    Ioc,
    /// Fill-or-kill
    Fok,
}

/// Order intent as requested by the decision authority, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: OrderSide,
    #[serde(default)]
    pub price: Option<f64>,
    pub size: f64,
    pub order_type: OrderType,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
}

/// Validated order, normalised and ready for transmission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTicket {
    pub product_code: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub size: f64,
    /// Present for limit orders only
    pub price: Option<f64>,
    pub time_in_force: TimeInForce,
    pub minute_to_expire: u32,
}

/// Exchange acknowledgement of an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    #[serde(alias = "child_order_acceptance_id")]
    pub order_id: String,
}
