//! Prompt templates for the trading decision request
//!
//! A template is a JSON array of chat messages whose contents may contain
//! `{market_data}`, `{ticker_data}`, `{portfolio_data}`, `{order_data}`,
//! `{execution_data}`, `{current_time}` and `{trading_interval}`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trader_core::decision::DecisionRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

const BUILTIN_SYSTEM: &str = "You are a cautious BTC/JPY spot trader. Every {trading_interval} minutes you \
review 5-minute signals and your account, then choose exactly one action with a function call: order, cancel, \
cancel_and_order or hold. Never risk more than the available balance.";

const BUILTIN_USER: &str = "Current time (UTC): {current_time}\n\n\
Signals (oldest first):\n{market_data}\n\n\
Ticker:\n{ticker_data}\n\n\
Balances:\n{portfolio_data}\n\n\
Open orders:\n{order_data}\n\n\
Recent executions:\n{execution_data}";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    messages: Vec<ChatMessage>,
}

impl PromptTemplate {
    pub fn builtin() -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: BUILTIN_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: BUILTIN_USER.to_string(),
                },
            ],
        }
    }

    /// Template from a messages file, or the built-in one if the file is
    /// missing or invalid
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::info!("Prompt file {} not found, using built-in prompt", path.display());
                return Self::builtin();
            }
        };

        match serde_json::from_str::<Vec<ChatMessage>>(&content) {
            Ok(messages) if !messages.is_empty() => Self { messages },
            Ok(_) => {
                tracing::warn!("Prompt file {} has no messages, using built-in prompt", path.display());
                Self::builtin()
            }
            Err(e) => {
                tracing::warn!("Invalid prompt file {}: {}, using built-in prompt", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Fill the placeholders from a decision request
    pub fn render(&self, request: &DecisionRequest, trading_interval: Duration) -> Result<Vec<ChatMessage>, anyhow::Error> {
        let values = [
            ("{market_data}", serde_json::to_string(&request.signals)?),
            ("{ticker_data}", serde_json::to_string(&request.ticker)?),
            ("{portfolio_data}", serde_json::to_string(&request.balances)?),
            ("{order_data}", serde_json::to_string(&request.open_orders)?),
            ("{execution_data}", serde_json::to_string(&request.executions)?),
            (
                "{current_time}",
                request.requested_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            ),
            ("{trading_interval}", (trading_interval.as_secs() / 60).to_string()),
        ];

        Ok(self
            .messages
            .iter()
            .map(|message| {
                let content = values
                    .iter()
                    .fold(message.content.clone(), |acc, (key, value)| acc.replace(key, value));
                ChatMessage {
                    role: message.role.clone(),
                    content,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trader_core::exchange::{Balance, Ticker};

    fn request() -> DecisionRequest {
        DecisionRequest {
            signals: Vec::new(),
            ticker: Ticker {
                product_code: "BTC_JPY".to_string(),
                ltp: 10_000_000.0,
                best_bid: 9_999_000.0,
                best_ask: 10_001_000.0,
                volume: 100.0,
                volume_by_product: 90.0,
            },
            balances: vec![Balance {
                currency: "JPY".to_string(),
                amount: 500_000.0,
                available: 475_000.0,
            }],
            open_orders: Vec::new(),
            executions: Vec::new(),
            requested_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn builtin_template_is_fully_rendered() {
        let messages = PromptTemplate::builtin()
            .render(&request(), Duration::from_secs(300))
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("Every 5 minutes"));
        assert!(messages[1].content.contains("2024-03-01T09:30:00.000Z"));
        assert!(messages[1].content.contains("\"ltp\":10000000.0"));
        assert!(messages[1].content.contains("\"available\":475000.0"));
        assert!(!messages[1].content.contains("{market_data}"));
    }

    #[test]
    fn loads_messages_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(
            &path,
            r#"[{"role": "user", "content": "interval={trading_interval} orders={order_data}"}]"#,
        )
        .unwrap();

        let messages = PromptTemplate::load(&path)
            .render(&request(), Duration::from_secs(600))
            .unwrap();
        assert_eq!(
            messages,
            vec![ChatMessage {
                role: "user".to_string(),
                content: "interval=10 orders=[]".to_string(),
            }]
        );
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let template = PromptTemplate::load(&dir.path().join("absent.json"));
        assert_eq!(template.messages().len(), 2);
    }
}
