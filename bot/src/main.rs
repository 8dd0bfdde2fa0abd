use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trader_core::execution::DispatchMode;

mod services;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "bot", about = "Signal-driven bitFlyer trading bot")]
struct Cli {
    /// Trading config file (JSON)
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the trading loop until too many consecutive cycles fail (default)
    Run,
    /// Run one full cycle with the decision forced, then exit
    DryRun {
        /// Send the decided orders instead of logging them
        #[arg(long, default_value_t = false)]
        live: bool,
    },
    /// Print the current signal rows as JSON
    Signals,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn execute(cli: Cli) -> Result<(), anyhow::Error> {
    let app_state = AppState::new(&cli.config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut trading = app_state.trading_loop(DispatchMode::Live)?;
            trading.run().await
        }
        Command::DryRun { live } => {
            let mode = if live { DispatchMode::Live } else { DispatchMode::DryRun };
            let mut trading = app_state.trading_loop(mode)?;
            let outcome = trading.run_once().await?;
            tracing::info!("Cycle outcome: {:?}", outcome);
            Ok(())
        }
        Command::Signals => {
            let mut trading = app_state.trading_loop(DispatchMode::DryRun)?;
            let rows = trading.current_signals().await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    tracing::info!("Starting trading bot...");

    match execute(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
