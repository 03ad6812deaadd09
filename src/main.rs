use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info, warn};

use review_watchbot::config::{self, Config};
use review_watchbot::notifier::{Notifier, TelegramTransport};
use review_watchbot::poller::{PollState, Poller};
use review_watchbot::status_api::PracticumClient;

/// Watches the review status of the latest homework submission and reports
/// changes to a Telegram chat.
///
/// Reads PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID from the
/// environment (or a `.env` file), plus optional PRACTICUM_ENDPOINT and
/// RETRY_PERIOD_SECS.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let _args = Args::parse();

    let lookup = config::layered_lookup(Path::new(config::ENV_FILE))?;

    if !config::check_tokens(&lookup) {
        error!(
            critical = true,
            missing = ?config::missing_tokens(&lookup),
            "required environment variables are missing; shutting down"
        );
        std::process::exit(1);
    }

    let cfg = match Config::from_lookup(&lookup) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(critical = true, %err, "invalid configuration; shutting down");
            std::process::exit(1);
        }
    };
    info!(?cfg, "configuration loaded");

    let api = PracticumClient::new(&cfg.endpoint, cfg.practicum_token.clone())?;
    let notifier = Notifier::new(
        TelegramTransport::new(cfg.telegram_token.clone()),
        cfg.chat_id.clone(),
    );
    let poller = Poller::new(api, notifier, cfg.retry_period);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received");
                let _ = stop_tx.send(true);
            }
            Err(err) => {
                warn!(?err, "cannot listen for ctrl-c; running until killed");
                // Dropping the sender would stop the loop.
                let _stop_tx = stop_tx;
                std::future::pending::<()>().await;
            }
        }
    });

    let mut state = PollState::starting_now();
    poller.run(&mut state, stop_rx).await;
    Ok(())
}
