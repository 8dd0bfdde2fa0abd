//! bitFlyer Lightning REST client

use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;
use trader_core::exchange::{
    Balance, BoardState, Exchange, Execution, OpenOrder, OrderAck, OrderSide, OrderTicket, OrderType, Ticker,
    TimeInForce,
};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct BitflyerClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    product_code: String,
}

/// `sendchildorder` body
#[derive(Debug, Serialize)]
struct ChildOrder<'a> {
    product_code: &'a str,
    child_order_type: OrderType,
    side: OrderSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    size: f64,
    minute_to_expire: u32,
    time_in_force: TimeInForce,
}

impl<'a> From<&'a OrderTicket> for ChildOrder<'a> {
    fn from(ticket: &'a OrderTicket) -> Self {
        Self {
            product_code: &ticket.product_code,
            child_order_type: ticket.order_type,
            side: ticket.side,
            price: match ticket.order_type {
                OrderType::Limit => ticket.price,
                OrderType::Market => None,
            },
            size: ticket.size,
            minute_to_expire: ticket.minute_to_expire,
            time_in_force: ticket.time_in_force,
        }
    }
}

#[derive(Debug, Serialize)]
struct CancelChildOrder<'a> {
    product_code: &'a str,
    child_order_acceptance_id: &'a str,
}

impl BitflyerClient {
    pub fn new(base_url: &str, api_key: &str, api_secret: &str, product_code: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            product_code: product_code.to_string(),
        })
    }

    /// Hex HMAC-SHA256 of `timestamp + method + path + body`, where `path`
    /// includes the query string
    fn sign(&self, timestamp: &str, method: &Method, path: &str, body: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes()).context("Invalid API secret")?;
        mac.update(timestamp.as_bytes());
        mac.update(method.as_str().as_bytes());
        mac.update(path.as_bytes());
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn request(&self, method: Method, endpoint: &str, query: &[(&str, String)], body: Option<String>) -> Result<String> {
        let path = if query.is_empty() {
            endpoint.to_string()
        } else {
            let query: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", endpoint, query.join("&"))
        };
        let body = body.unwrap_or_default();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let sign = self.sign(&timestamp, &method, &path, &body)?;

        debug!("bitFlyer {} {}", method, path);
        let response = self
            .client
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .header("ACCESS-KEY", &self.api_key)
            .header("ACCESS-TIMESTAMP", &timestamp)
            .header("ACCESS-SIGN", sign)
            .header("Content-Type", "application/json")
            .body(body.clone())
            .send()
            .await
            .with_context(|| format!("bitFlyer {} {} failed", method, path))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!(
                "bitFlyer API error: method={}, path={}, body={}, status={}, response={}",
                method,
                path,
                body,
                status,
                text
            );
        }

        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let text = self.request(Method::GET, endpoint, query, None).await?;
        serde_json::from_str(&text).with_context(|| format!("Unexpected response from {}: {}", endpoint, text))
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<String> {
        let body = serde_json::to_string(body)?;
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    fn product_query(&self) -> Vec<(&'static str, String)> {
        vec![("product_code", self.product_code.clone())]
    }
}

#[async_trait]
impl Exchange for BitflyerClient {
    async fn board_state(&self) -> Result<BoardState> {
        self.get("/v1/getboardstate", &self.product_query()).await
    }

    async fn ticker(&self) -> Result<Ticker> {
        self.get("/v1/getticker", &self.product_query()).await
    }

    async fn balances(&self) -> Result<Vec<Balance>> {
        self.get("/v1/me/getbalance", &[]).await
    }

    async fn open_orders(&self) -> Result<Vec<OpenOrder>> {
        let mut query = self.product_query();
        query.push(("child_order_state", "ACTIVE".to_string()));
        self.get("/v1/me/getchildorders", &query).await
    }

    async fn executions(&self, count: usize) -> Result<Vec<Execution>> {
        let mut query = self.product_query();
        query.push(("count", count.to_string()));
        self.get("/v1/me/getexecutions", &query).await
    }

    async fn send_order(&self, ticket: &OrderTicket) -> Result<OrderAck> {
        let text = self.post("/v1/me/sendchildorder", &ChildOrder::from(ticket)).await?;
        serde_json::from_str(&text).with_context(|| format!("Unexpected order response: {}", text))
    }

    async fn cancel_order(&self, order_id: &str) -> Result<()> {
        let body = CancelChildOrder {
            product_code: &self.product_code,
            child_order_acceptance_id: order_id,
        };
        self.post("/v1/me/cancelchildorder", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BitflyerClient {
        BitflyerClient::new("https://api.bitflyer.jp/", "key", "secret", "BTC_JPY").unwrap()
    }

    #[test]
    fn signs_path_with_query() {
        let sign = client()
            .sign(
                "1700000000",
                &Method::GET,
                "/v1/me/getchildorders?product_code=BTC_JPY&child_order_state=ACTIVE",
                "",
            )
            .unwrap();
        assert_eq!(sign, "075059f8efb227a4ebe1d44c21833aa6bad1e0261ce7c813f36181bb909d33cb");
    }

    #[test]
    fn signs_post_body() {
        let body = serde_json::to_string(&CancelChildOrder {
            product_code: "BTC_JPY",
            child_order_acceptance_id: "JRF1",
        })
        .unwrap();
        let sign = client()
            .sign("1700000000", &Method::POST, "/v1/me/cancelchildorder", &body)
            .unwrap();
        assert_eq!(sign, "bdcd866bf515d97c9944a2afe4344ae8f1400a4115787f06d7fcc0d56c83eaf1");
    }

    #[test]
    fn child_order_body() {
        let mut ticket = OrderTicket {
            product_code: "BTC_JPY".to_string(),
            side: OrderSide::Sell,
            order_type: OrderType::Limit,
            size: 0.01,
            price: Some(10_500_000.0),
            time_in_force: TimeInForce::Gtc,
            minute_to_expire: 30,
        };

        let body = serde_json::to_value(ChildOrder::from(&ticket)).unwrap();
        assert_eq!(body["child_order_type"], "LIMIT");
        assert_eq!(body["side"], "SELL");
        assert_eq!(body["price"], 10_500_000.0);
        assert_eq!(body["minute_to_expire"], 30);
        assert_eq!(body["time_in_force"], "GTC");

        ticket.order_type = OrderType::Market;
        let body = serde_json::to_value(ChildOrder::from(&ticket)).unwrap();
        assert!(body.get("price").is_none());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url, "https://api.bitflyer.jp");
    }
}
