pub mod bitflyer;
pub mod config;
pub mod cryptocompare;

pub use bitflyer::BitflyerClient;
pub use config::{load_trading_config, Config};
pub use cryptocompare::CryptoCompareClient;
