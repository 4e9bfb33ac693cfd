use anyhow::Context;
use hypewatch::engine::SeenFillIds;
use hypewatch::orchestration::{MonitorCycle, MonitorState, PollingScheduler, ShutdownSignal};
use hypewatch::{
    Address, Config, DataSource, HyperliquidDataSource, MonitorError, Notifier, TelegramNotifier,
};
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_file.as_deref())?;

    // Signals arriving during the first cycle must already be caught.
    let shutdown = ShutdownSignal::install().context("failed to install signal handlers")?;

    let address = Address::new(config.address.clone());
    tracing::info!("Initialized monitor for address: {}", address);
    tracing::info!(
        "Using {} API at {}",
        if config.use_testnet { "testnet" } else { "mainnet" },
        config.hyperliquid_api_url
    );

    let datasource: Arc<dyn DataSource> = Arc::new(HyperliquidDataSource::new(
        config.hyperliquid_api_url.clone(),
        config.http_timeout,
    )?);
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
        config.http_timeout,
    )?);

    let state = match config.seen_fills_retention_polls {
        Some(polls) => MonitorState::with_seen_fills(SeenFillIds::with_retention(polls)),
        None => MonitorState::new(),
    };
    let mut cycle = MonitorCycle::new(address, datasource, notifier).with_state(state);

    PollingScheduler::new(config.check_interval)
        .run(&mut cycle, shutdown.recv())
        .await?;

    Ok(())
}

fn init_tracing(log_file: Option<&str>) -> Result<(), MonitorError> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| MonitorError::Logging(format!("{}: {}", path, e)))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| MonitorError::Logging(e.to_string()))
}
