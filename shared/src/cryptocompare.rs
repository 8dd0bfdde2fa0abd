//! CryptoCompare minute history as a bar source

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use trader_core::data::{BarSource, Snapshot};
use tracing::{debug, warn};

const HISTOMINUTE_URL: &str = "https://min-api.cryptocompare.com/data/v2/histominute";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoResponse {
    response: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoData {
    #[serde(default)]
    data: Vec<MinuteBar>,
}

#[derive(Debug, Deserialize)]
struct MinuteBar {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volumefrom: f64,
}

/// Decode a `histominute` response into time-ascending bar snapshots
pub fn parse_histominute(body: &str) -> Result<Vec<Snapshot>> {
    let response: HistoResponse = serde_json::from_str(body).context("Unexpected histominute response")?;
    if response.response != "Success" {
        anyhow::bail!("Failed to fetch data: {}", response.message);
    }

    let data: HistoData = serde_json::from_value(response.data).context("Unexpected histominute data")?;
    let mut snapshots: Vec<Snapshot> = data
        .data
        .into_iter()
        .filter_map(|bar| {
            let Some(timestamp) = DateTime::from_timestamp(bar.time, 0) else {
                warn!("Skipping minute bar with invalid time {}", bar.time);
                return None;
            };
            Some(Snapshot::bar(timestamp, bar.open, bar.high, bar.low, bar.close, bar.volumefrom))
        })
        .collect();
    snapshots.sort_by_key(|s| s.timestamp);
    Ok(snapshots)
}

pub struct CryptoCompareClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    fsym: String,
    tsym: String,
    limit: u32,
}

impl CryptoCompareClient {
    pub fn new(api_key: Option<String>, fsym: &str, tsym: &str, limit: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: HISTOMINUTE_URL.to_string(),
            api_key,
            fsym: fsym.to_string(),
            tsym: tsym.to_string(),
            limit,
        })
    }
}

#[async_trait]
impl BarSource for CryptoCompareClient {
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>> {
        let mut params = vec![
            ("fsym", self.fsym.clone()),
            ("tsym", self.tsym.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let body = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("histominute {}/{} request failed", self.fsym, self.tsym))?
            .text()
            .await?;

        let snapshots = parse_histominute(&body)?;
        debug!("Fetched {} minute bars for {}/{}", snapshots.len(), self.fsym, self.tsym);
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_bars_in_time_order() {
        let body = r#"{
            "Response": "Success",
            "Message": "",
            "Data": {
                "TimeFrom": 1700000000,
                "TimeTo": 1700000060,
                "Data": [
                    {"time": 1700000060, "open": 101.0, "high": 103.0, "low": 100.5, "close": 102.0, "volumefrom": 0.5, "volumeto": 51.0},
                    {"time": 1700000000, "open": 100.0, "high": 101.5, "low": 99.0, "close": 101.0, "volumefrom": 1.5, "volumeto": 150.0}
                ]
            }
        }"#;

        let snapshots = parse_histominute(body).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].timestamp.timestamp(), 1700000000);
        assert_eq!(snapshots[0].close(), 101.0);
        assert_eq!(snapshots[1].high(), 103.0);
        assert_eq!(snapshots[1].volume, 0.5);
    }

    #[test]
    fn error_response_carries_message() {
        let body = r#"{"Response": "Error", "Message": "You are over your rate limit", "Data": []}"#;
        let err = parse_histominute(body).unwrap_err();
        assert!(err.to_string().contains("rate limit"));
    }
}
