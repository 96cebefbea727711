//! homework-bot — relays Practicum homework review statuses to Telegram.
//!
//! Polls the homework status API on a fixed interval and sends a chat
//! message whenever a submission's review status changes.

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use log::{error, info};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use homework_bot::channel::telegram::TelegramChannel;
use homework_bot::config::{BotConfig, Credentials};
use homework_bot::error::ConfigError;
use homework_bot::logging::init_logging;
use homework_bot::poller::Poller;
use homework_bot::practicum::PracticumClient;

/// Practicum homework bot — notifies a Telegram chat about review status changes.
#[derive(Parser)]
#[command(name = "homework-bot", version, about)]
struct Cli {
    /// Path to config file (missing file = defaults).
    #[arg(short, long, default_value = "homework_bot.toml")]
    config: PathBuf,

    /// Run a single poll, then exit.
    #[arg(long)]
    once: bool,

    /// Initial cursor as a Unix timestamp (defaults to now).
    #[arg(long)]
    from_date: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = BotConfig::load(&cli.config)?;
    let _logger = init_logging(&config.log_level, &config.log_file)
        .wrap_err_with(|| format!("failed to start logging to {}", config.log_file.display()))?;

    // Variables already set in the environment win over `.env`.
    dotenvy::dotenv().ok();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            if let ConfigError::MissingVariables(names) = &e {
                for name in names {
                    error!("fatal: required environment variable {name} is not set");
                }
            }
            error!("fatal: bot cannot start: {e}");
            return Err(e.into());
        }
    };

    let source = PracticumClient::new(
        &config.endpoint,
        &credentials.practicum_token,
        config.request_timeout(),
    )
    .wrap_err("failed to build homework API client")?;
    let notifier = TelegramChannel::new(
        &config.telegram_api_base,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
        config.request_timeout(),
    )
    .wrap_err("failed to build Telegram client")?;

    let cursor = cli.from_date.unwrap_or_else(|| Utc::now().timestamp());
    let mut poller = Poller::new(source, notifier, cursor)
        .with_interval(config.poll_interval())
        .with_error_reports(config.report_errors);

    if cli.once {
        if let Err(e) = poller.iterate().await {
            bail!("poll failed: {e}");
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("shutdown signal received");
        shutdown_cancel.cancel();
    });

    poller.run(cancel).await;
    Ok(())
}

/// Resolve on SIGINT or (on unix) SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                let _ = ctrl_c.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
