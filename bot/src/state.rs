use crate::services::{OpenAiService, PromptTemplate};
use shared::{BitflyerClient, Config, CryptoCompareClient};
use std::path::Path;
use std::sync::Arc;
use trader_core::config::SignalSource;
use trader_core::data::BarSource;
use trader_core::execution::DispatchMode;
use trader_core::runner::TradingLoop;

pub struct AppState {
    pub config: Config,
    pub exchange: Arc<BitflyerClient>,
    pub authority: Arc<OpenAiService>,
    pub bar_source: Option<Arc<dyn BarSource>>,
}

impl AppState {
    pub fn new(config_file: &Path) -> Result<Self, anyhow::Error> {
        let config = Config::from_env(config_file)?;
        let trading = &config.trading;

        let exchange = Arc::new(BitflyerClient::new(
            &config.bitflyer_base_url,
            &config.bitflyer_api_key,
            &config.bitflyer_api_secret,
            &trading.product_code,
        )?);

        let authority = Arc::new(OpenAiService::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.openai_base_url.clone(),
            PromptTemplate::load(&trading.prompt_file),
            trading.decide_interval(),
        )?);

        let bar_source: Option<Arc<dyn BarSource>> = match trading.signal_source {
            SignalSource::CryptoCompare => {
                let (fsym, tsym) = trading
                    .currencies()
                    .ok_or_else(|| anyhow::anyhow!("Cannot split product code {}", trading.product_code))?;
                let source: Arc<dyn BarSource> = Arc::new(CryptoCompareClient::new(
                    config.cryptocompare_api_key.clone(),
                    &fsym,
                    &tsym,
                    trading.history_limit,
                )?);
                Some(source)
            }
            SignalSource::Snapshots => None,
        };

        tracing::info!(
            "AppState initialized: {} via {} (model {}, signals from {:?})",
            trading.product_code,
            config.bitflyer_base_url,
            config.openai_model,
            trading.signal_source
        );

        Ok(AppState {
            config,
            exchange,
            authority,
            bar_source,
        })
    }

    pub fn trading_loop(&self, mode: DispatchMode) -> Result<TradingLoop, anyhow::Error> {
        let trading = TradingLoop::new(
            self.config.trading.clone(),
            self.exchange.clone(),
            self.authority.clone(),
            mode,
        )?;

        Ok(match &self.bar_source {
            Some(source) => trading.with_bar_source(source.clone()),
            None => trading,
        })
    }
}
