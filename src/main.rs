use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tracing::info;

use silverbullet::{
    config::AppConfig,
    engine::engine::{EngineSettings, EntryEngine, run_entry_loop},
    execution::dispatcher::OandaDispatcher,
    journal::Journal,
    logger::init_tracing,
    market::oanda::client::OandaClient,
    notify::{Notifier, telegram::TelegramNotifier},
    server,
    signal::risk::RiskPolicy,
};

/// Constructs the broker-facing collaborators and the engine around
/// them. The engine owns its day state from here on.
fn build_engine(
    cfg: &AppConfig,
    journal: Journal,
    notifier: Arc<TelegramNotifier>,
) -> anyhow::Result<EntryEngine<OandaClient, OandaDispatcher, TelegramNotifier>> {
    let feed = OandaClient::new(
        cfg.env,
        cfg.api_key.clone(),
        cfg.instrument.clone(),
        cfg.price_precision,
    )?;

    let dispatcher = OandaDispatcher::new(
        cfg.env,
        cfg.api_key.clone(),
        cfg.account_id.clone(),
        cfg.instrument.clone(),
        cfg.price_precision,
    )?;

    let settings = EngineSettings {
        window: cfg.window,
        risk: RiskPolicy {
            buffer: cfg.entry_buffer,
            reward_multiple: cfg.reward_multiple,
            position_size: cfg.position_size,
            price_precision: cfg.price_precision,
        },
        proximity_tolerance: cfg.proximity_tolerance,
        failure_policy: cfg.failure_policy,
    };

    Ok(EntryEngine::new(
        Arc::new(feed),
        Arc::new(dispatcher),
        notifier,
        journal,
        settings,
        Local::now().date_naive(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    info!("Starting Silver Bullet bot...");

    // Missing credentials abort here, before any network activity.
    let cfg = AppConfig::from_env()?;

    let journal = Journal::new(cfg.journal_path.clone());
    let notifier = Arc::new(TelegramNotifier::new(
        cfg.telegram_token.clone(),
        cfg.chat_id.clone(),
    )?);

    let engine = build_engine(&cfg, journal.clone(), notifier.clone())?;

    engine
        .announce(&format!(
            "SILVER BULLET BOT STARTED – Hunting {}–{}",
            cfg.window.start.format("%H:%M"),
            cfg.window.end.format("%H:%M")
        ))
        .await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let loop_handle = tokio::spawn(run_entry_loop(
        engine,
        cfg.poll_interval,
        shutdown_rx.clone(),
    ));
    let server_handle = tokio::spawn(server::serve(cfg.port, journal.clone(), shutdown_rx));

    journal.append("SILVER BULLET BOT FULLY LIVE & ARMED");
    notifier.send("SILVER BULLET BOT FULLY LIVE & ARMED").await;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    let _ = loop_handle.await;
    let _ = server_handle.await;

    Ok(())
}
