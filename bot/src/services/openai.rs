//! OpenAI Service for Trading Decisions
//!
//! Sends the rendered prompt to an OpenAI-compatible chat completions
//! endpoint with the trading functions as tools and decodes the first
//! function call into a [`Decision`].

use super::prompt::{ChatMessage, PromptTemplate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use trader_core::decision::{Decision, DecisionAuthority, DecisionRequest};

pub struct OpenAiService {
    api_key: String,
    model_name: String,
    base_url: String,
    client: reqwest::Client,
    template: PromptTemplate,
    trading_interval: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    tools: serde_json::Value,
    tool_choice: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn order_properties() -> serde_json::Value {
    json!({
        "side": {
            "type": "string",
            "enum": ["BUY", "SELL"],
            "description": "The direction of the trade."
        },
        "price": {
            "type": "integer",
            "description": "The order price in JPY, in units of 1 JPY. Required for LIMIT orders."
        },
        "size": {
            "type": "number",
            "description": "The order quantity in BTC. The minimum is 0.0001 BTC."
        },
        "order_type": {
            "type": "string",
            "enum": ["LIMIT", "MARKET"],
            "description": "'LIMIT' for a limit order or 'MARKET' for a market order."
        },
        "time_in_force": {
            "type": "string",
            "enum": ["GTC", "IOC", "FOK"],
            "description": "Good-Til-Canceled, Immediate-Or-Cancel or Fill-Or-Kill."
        }
    })
}

/// Function definitions offered to the model
fn trading_tools() -> serde_json::Value {
    let mut cancel_and_order = order_properties();
    cancel_and_order["order_id"] = json!({
        "type": "string",
        "description": "The child_order_acceptance_id of the order to cancel."
    });

    json!([
        {
            "type": "function",
            "function": {
                "name": "order",
                "description": "Place a BTC buy or sell order. Unfilled orders expire after 30 minutes.",
                "parameters": {
                    "type": "object",
                    "properties": order_properties(),
                    "required": ["side", "price", "size", "order_type", "time_in_force"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "cancel",
                "description": "Cancel an open BTC order. No new order can be placed until the next decision; use cancel_and_order to replace an order.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "order_id": {
                            "type": "string",
                            "description": "The child_order_acceptance_id of the order to cancel."
                        }
                    },
                    "required": ["order_id"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "cancel_and_order",
                "description": "Cancel an open BTC order and place a new one.",
                "parameters": {
                    "type": "object",
                    "properties": cancel_and_order,
                    "required": ["order_id", "side", "price", "size", "order_type"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "hold",
                "description": "Hold the current position without taking any action."
            }
        }
    ])
}

/// First function call of the first choice; `Decision::None` without one
fn decision_from_response(response: ChatResponse) -> Result<Decision, anyhow::Error> {
    let call = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.tool_calls)
        .and_then(|calls| calls.into_iter().next());

    match call {
        Some(call) => {
            tracing::info!("Tool call: {} {}", call.function.name, call.function.arguments);
            Ok(Decision::from_tool_call(&call.function.name, &call.function.arguments)?)
        }
        None => {
            tracing::warn!("No tool call in response");
            Ok(Decision::None)
        }
    }
}

impl OpenAiService {
    pub fn new(
        api_key: String,
        model_name: String,
        base_url: String,
        template: PromptTemplate,
        trading_interval: Duration,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            api_key,
            model_name,
            base_url,
            client,
            template,
            trading_interval,
        })
    }

    fn build_api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DecisionAuthority for OpenAiService {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, anyhow::Error> {
        let body = ChatRequest {
            model: &self.model_name,
            messages: self.template.render(request, self.trading_interval)?,
            tools: trading_tools(),
            tool_choice: "required",
        };

        let response = self
            .client
            .post(self.build_api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("OpenAI API error ({}): {}", status, error_text));
        }

        let chat_response: ChatResponse = response.json().await?;
        decision_from_response(chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trader_core::exchange::{OrderSide, OrderType};

    fn response(body: &str) -> ChatResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn decodes_first_tool_call() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "order",
                            "arguments": "{\"side\": \"SELL\", \"price\": 10500000, \"size\": 0.002, \"order_type\": \"LIMIT\", \"time_in_force\": \"GTC\"}"
                        }
                    }]
                }
            }]
        }"#;

        match decision_from_response(response(body)).unwrap() {
            Decision::Order(order) => {
                assert_eq!(order.side, OrderSide::Sell);
                assert_eq!(order.order_type, OrderType::Limit);
                assert_eq!(order.price, Some(10_500_000.0));
                assert_eq!(order.size, 0.002);
            }
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn no_tool_call_is_none() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "I would wait."}}]}"#;
        assert_eq!(decision_from_response(response(body)).unwrap(), Decision::None);
    }

    #[test]
    fn unknown_function_is_an_error() {
        let body = r#"{"choices": [{"message": {"tool_calls": [{"function": {"name": "withdraw", "arguments": "{}"}}]}}]}"#;
        assert!(decision_from_response(response(body)).is_err());
    }

    #[test]
    fn tools_cover_every_decision() {
        let tools = trading_tools();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["function"]["name"].as_str())
            .collect();
        assert_eq!(names, vec!["order", "cancel", "cancel_and_order", "hold"]);
        assert!(tools[2]["function"]["parameters"]["properties"]["order_id"].is_object());
    }
}
