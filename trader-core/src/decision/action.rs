//! Decisions returned by the decision authority

use crate::error::DecisionParseError;
use crate::exchange::OrderRequest;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Action chosen for one cycle. Consumed once.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Place a new order
    Order(OrderRequest),
    /// Cancel a resting order
    Cancel { order_id: String },
    /// Cancel a resting order, then place a replacement
    CancelAndOrder { order_id: String, order: OrderRequest },
    /// Keep the current position
    Hold,
    /// The authority returned nothing actionable
    None,
}

#[derive(Deserialize)]
struct CancelArgs {
    order_id: String,
}

#[derive(Deserialize)]
struct CancelAndOrderArgs {
    order_id: String,
    #[serde(flatten)]
    order: OrderRequest,
}

fn parse_args<T: DeserializeOwned>(function: &str, arguments: &str) -> Result<T, DecisionParseError> {
    serde_json::from_str(arguments).map_err(|source| DecisionParseError::InvalidArguments {
        function: function.to_string(),
        source,
    })
}

impl Decision {
    /// Decode a function call (`order`, `cancel`, `cancel_and_order`,
    /// `hold`) with its JSON-encoded arguments
    pub fn from_tool_call(name: &str, arguments: &str) -> Result<Self, DecisionParseError> {
        match name {
            "order" => Ok(Decision::Order(parse_args(name, arguments)?)),
            "cancel" => {
                let args: CancelArgs = parse_args(name, arguments)?;
                Ok(Decision::Cancel {
                    order_id: args.order_id,
                })
            }
            "cancel_and_order" => {
                let args: CancelAndOrderArgs = parse_args(name, arguments)?;
                if args.order.price.is_none() {
                    return Err(DecisionParseError::MissingPrice(name.to_string()));
                }
                Ok(Decision::CancelAndOrder {
                    order_id: args.order_id,
                    order: args.order,
                })
            }
            "hold" => Ok(Decision::Hold),
            other => Err(DecisionParseError::UnknownFunction(other.to_string())),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Order(_) => "order",
            Decision::Cancel { .. } => "cancel",
            Decision::CancelAndOrder { .. } => "cancel_and_order",
            Decision::Hold => "hold",
            Decision::None => "none",
        }
    }

    /// Whether this decision needs the dispatcher at all
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Decision::Hold | Decision::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{OrderSide, OrderType, TimeInForce};

    #[test]
    fn order_with_optional_fields() {
        let decision = Decision::from_tool_call(
            "order",
            r#"{"side": "SELL", "size": 0.002, "order_type": "MARKET"}"#,
        )
        .unwrap();
        let Decision::Order(order) = decision else {
            panic!("expected order");
        };
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.price, None);
        assert_eq!(order.time_in_force, None);
    }

    #[test]
    fn cancel_and_order_carries_both_parts() {
        let decision = Decision::from_tool_call(
            "cancel_and_order",
            r#"{"order_id": "JRF-1", "side": "BUY", "price": 9000000, "size": 0.001, "order_type": "LIMIT", "time_in_force": "FOK"}"#,
        )
        .unwrap();
        match decision {
            Decision::CancelAndOrder { order_id, order } => {
                assert_eq!(order_id, "JRF-1");
                assert_eq!(order.price, Some(9_000_000.0));
                assert_eq!(order.time_in_force, Some(TimeInForce::Fok));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cancel_and_order_without_price_is_rejected() {
        let err = Decision::from_tool_call(
            "cancel_and_order",
            r#"{"order_id": "JRF-1", "side": "BUY", "size": 0.001, "order_type": "MARKET"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecisionParseError::MissingPrice(_)));
    }

    #[test]
    fn hold_ignores_arguments() {
        assert_eq!(Decision::from_tool_call("hold", "").unwrap(), Decision::Hold);
        assert!(!Decision::Hold.is_actionable());
        assert!(!Decision::None.is_actionable());
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(matches!(
            Decision::from_tool_call("buy_everything", "{}"),
            Err(DecisionParseError::UnknownFunction(_))
        ));
        assert!(matches!(
            Decision::from_tool_call("cancel", r#"{"id": 3}"#),
            Err(DecisionParseError::InvalidArguments { .. })
        ));
        assert!(matches!(
            Decision::from_tool_call("order", r#"{"side": "HODL", "size": 1, "order_type": "LIMIT"}"#),
            Err(DecisionParseError::InvalidArguments { .. })
        ));
    }
}
