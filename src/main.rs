use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bin_lookup::telegram::{run_polling, TelegramClient};
use bin_lookup::table::ensure_extracted;
use bin_lookup::{health, load, BinlistClient, BotHandler, Config, Resolver};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing::info!(version = bin_lookup::VERSION, "starting BIN lookup bot");

    // 1. Table first: nothing is served without it
    let data_path = Config::data_path_from_env();
    ensure_extracted(&data_path, &Config::archive_path_from_env())
        .context("Failed to unpack BIN dataset")?;
    let table = load(&data_path).context("Failed to load BIN table")?;

    // 2. Credentials
    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    // 3. Health server in the background
    let listener = health::bind(config.port).await?;
    tokio::spawn(async move {
        if let Err(e) = health::serve(listener).await {
            tracing::error!("{:#}", e);
        }
    });

    // 4. Transport
    let telegram = TelegramClient::new(&config.telegram_api_url, &config.token)?;
    let me = telegram.get_me().await.context("Failed to identify bot")?;
    telegram
        .reset_webhook()
        .await
        .context("Failed to reset webhook")?;

    // 5. Lookup pipeline
    let remote = BinlistClient::new(&config.lookup_url, config.lookup_timeout)
        .context("Failed to create lookup client")?;
    let resolver = Resolver::new(Arc::new(table), Arc::new(remote));
    let mut handler = BotHandler::new(resolver);
    if let Some(username) = me.username {
        tracing::info!(%username, "bot identified");
        handler = handler.with_username(username);
    }

    run_polling(&telegram, &handler).await
}
