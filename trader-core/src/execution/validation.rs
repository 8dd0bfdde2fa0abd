//! Order validation and normalisation

use crate::config::TradingConfig;
use crate::exchange::{OrderRequest, OrderTicket, OrderType};
use crate::portfolio::round_decimals;
use std::fmt;

/// Why an order was dropped before transmission
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Size under the exchange minimum
    BelowMinimumSize { size: f64, minimum: f64 },
    /// Limit order without a usable price
    MissingLimitPrice,
    /// Price or size is not a finite number
    NotFinite { field: &'static str },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::BelowMinimumSize { size, minimum } => {
                write!(f, "size {} is below the minimum {}", size, minimum)
            }
            RejectReason::MissingLimitPrice => write!(f, "LIMIT order has no price"),
            RejectReason::NotFinite { field } => write!(f, "{} is not a finite number", field),
        }
    }
}

/// Result of validating an order request
#[derive(Debug, Clone, PartialEq)]
pub enum OrderValidation {
    Accepted(OrderTicket),
    Rejected(RejectReason),
}

/// Order validator
#[derive(Debug, Clone)]
pub struct OrderValidator {
    product_code: String,
    min_order_size: f64,
    decimals: u32,
    minute_to_expire: u32,
}

impl OrderValidator {
    pub fn new(product_code: impl Into<String>, min_order_size: f64, decimals: u32, minute_to_expire: u32) -> Self {
        Self {
            product_code: product_code.into(),
            min_order_size,
            decimals,
            minute_to_expire,
        }
    }

    pub fn from_config(config: &TradingConfig) -> Self {
        Self::new(
            config.product_code.clone(),
            config.min_order_size,
            config.order_decimals,
            config.minute_to_expire,
        )
    }

    /// Check the minimum size and the limit price, then round price and
    /// size to the configured decimals
    pub fn validate(&self, request: &OrderRequest) -> OrderValidation {
        if request.size.is_nan() || request.size < self.min_order_size {
            return OrderValidation::Rejected(RejectReason::BelowMinimumSize {
                size: request.size,
                minimum: self.min_order_size,
            });
        }

        let Some(size) = round_decimals(request.size, self.decimals) else {
            return OrderValidation::Rejected(RejectReason::NotFinite { field: "size" });
        };

        let price = match (request.order_type, request.price) {
            (OrderType::Limit, None) => return OrderValidation::Rejected(RejectReason::MissingLimitPrice),
            (OrderType::Limit, Some(p)) if p.is_finite() && p <= 0.0 => {
                return OrderValidation::Rejected(RejectReason::MissingLimitPrice)
            }
            (OrderType::Limit, Some(p)) => match round_decimals(p, self.decimals) {
                Some(p) => Some(p),
                None => return OrderValidation::Rejected(RejectReason::NotFinite { field: "price" }),
            },
            (OrderType::Market, _) => None,
        };

        OrderValidation::Accepted(OrderTicket {
            product_code: self.product_code.clone(),
            side: request.side,
            order_type: request.order_type,
            size,
            price,
            time_in_force: request.time_in_force.unwrap_or_default(),
            minute_to_expire: self.minute_to_expire,
        })
    }
}
