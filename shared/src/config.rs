use dotenv::dotenv;
use std::path::Path;
use trader_core::config::TradingConfig;
use tracing::{info, warn};

pub struct Config {
    pub bitflyer_api_key: String,
    pub bitflyer_api_secret: String,
    pub bitflyer_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub cryptocompare_api_key: Option<String>,
    pub trading: TradingConfig,
}

impl Config {
    /// Secrets from the environment (and `.env`), tunables from `config_file`
    pub fn from_env(config_file: &Path) -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            bitflyer_api_key: required("BITFLYER_API_KEY")?,
            bitflyer_api_secret: required("BITFLYER_API_SECRET")?,
            bitflyer_base_url: std::env::var("BITFLYER_BASE_URL")
                .unwrap_or_else(|_| "https://api.bitflyer.jp".to_string()),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            cryptocompare_api_key: std::env::var("CRYPTOCOMPARE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            trading: load_trading_config(config_file),
        })
    }
}

fn required(name: &str) -> Result<String, anyhow::Error> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} is not set", name))
}

/// Read trading tunables, falling back to defaults when the file is
/// missing or unreadable
pub fn load_trading_config(path: &Path) -> TradingConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            info!("No trading config at {} ({}), using defaults", path.display(), e);
            return TradingConfig::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => {
            info!("Loaded trading config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Invalid trading config {}: {}, using defaults", path.display(), e);
            TradingConfig::default()
        }
    }
}
