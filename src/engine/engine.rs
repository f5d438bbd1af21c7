//! Entry decision engine.
//!
//! Responsibilities:
//! - Drive one decision attempt per tick: detect → proximity gate →
//!   risk levels → dispatch.
//! - Own `DayState` exclusively and guarantee at most one fired trade
//!   per calendar date.
//! - Convert every collaborator failure into a tick outcome; nothing
//!   escapes a tick.
//!
//! Non-responsibilities:
//! - Fetching transport details (the `CandleFeed` impl does this).
//! - Order payload shape (the `OrderDispatcher` impl does this).
//! - Serving state to observers: outsiders only ever see journal text.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument, warn};

use crate::engine::state::DayState;
use crate::engine::window::EntryWindow;
use crate::execution::dispatcher::OrderDispatcher;
use crate::execution::types::TradeDecision;
use crate::journal::Journal;
use crate::market::feed::CandleFeed;
use crate::notify::Notifier;
use crate::signal::risk::{self, RiskPolicy};
use crate::signal::{detector, proximity};

/// Candle sampling used for detection.
pub const DETECT_GRANULARITY: &str = "M15";
pub const DETECT_CANDLE_COUNT: u32 = 10;

/// What a single tick did. Purely observational; the engine's own
/// behavior depends only on `DayState` and the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Current time is outside the entry window.
    OutsideWindow,
    /// Today's single permitted entry is already spent.
    AlreadyFired,
    /// Feed call failed or timed out; nothing changed.
    DataUnavailable,
    /// No imbalance in the recent candles.
    NoPattern,
    /// Zone found but the price has moved too far from it.
    PatternOutOfZone,
    /// A trade decision was dispatched.
    Fired(TradeDecision),
    /// The broker rejected the order.
    DispatchFailed { reason: String },
}

/// What happens to the day when the broker rejects the order.
///
/// `Consume` spends the day anyway; `Rearm` leaves it armed so later
/// ticks in the same window may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchFailurePolicy {
    #[default]
    Consume,
    Rearm,
}

impl FromStr for DispatchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consume" => Ok(DispatchFailurePolicy::Consume),
            "rearm" => Ok(DispatchFailurePolicy::Rearm),
            other => Err(format!("unknown dispatch failure policy: {other}")),
        }
    }
}

/// Static knobs of the engine, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub window: EntryWindow,
    pub risk: RiskPolicy,
    /// Maximum distance between current price and the zone bounds
    /// before the zone is considered stale.
    pub proximity_tolerance: f64,
    pub failure_policy: DispatchFailurePolicy,
}

pub struct EntryEngine<F, D, N> {
    feed: Arc<F>,
    dispatcher: Arc<D>,
    notifier: Arc<N>,
    journal: Journal,
    settings: EngineSettings,
    day: DayState,
}

impl<F, D, N> EntryEngine<F, D, N>
where
    F: CandleFeed,
    D: OrderDispatcher,
    N: Notifier,
{
    pub fn new(
        feed: Arc<F>,
        dispatcher: Arc<D>,
        notifier: Arc<N>,
        journal: Journal,
        settings: EngineSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            feed,
            dispatcher,
            notifier,
            journal,
            settings,
            day: DayState::new(today),
        }
    }

    /// Journal a line and mirror it to the notifier.
    pub async fn announce(&self, message: &str) {
        self.journal.append(message);
        self.notifier.send(message).await;
    }

    /// One decision attempt at wall-clock time `now`.
    #[instrument(skip(self), fields(time = %now.time()), level = "debug")]
    pub async fn on_tick(&mut self, now: DateTime<Local>) -> TickOutcome {
        if self.day.roll(now.date_naive()) {
            info!(date = %now.date_naive(), "new trading day");
            self.announce("New day – entry armed").await;
        }

        if !self.settings.window.contains(now.time()) {
            return TickOutcome::OutsideWindow;
        }
        if !self.day.armed() {
            return TickOutcome::AlreadyFired;
        }

        self.journal.append("Window open – scanning for imbalance...");

        let candles = match self
            .feed
            .fetch_candles(DETECT_GRANULARITY, DETECT_CANDLE_COUNT)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "candle fetch failed; no result this tick");
                return TickOutcome::DataUnavailable;
            }
        };

        let Some(zone) = detector::detect(&candles) else {
            debug!("no imbalance in recent candles");
            return TickOutcome::NoPattern;
        };

        let price = match self.feed.fetch_price().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "price fetch failed; no result this tick");
                return TickOutcome::DataUnavailable;
            }
        };

        if !proximity::accept(&zone, price, self.settings.proximity_tolerance) {
            self.announce(&format!(
                "Imbalance found but price {price} not in zone {}-{}",
                zone.bottom, zone.top
            ))
            .await;
            return TickOutcome::PatternOutOfZone;
        }

        let direction = zone.kind.direction();
        let levels = risk::compute(direction, &zone, price, &self.settings.risk);
        let decision = TradeDecision {
            direction,
            entry_price: price,
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            units: levels.units,
        };

        match self.dispatcher.submit(&decision).await {
            Ok(receipt) => {
                self.day.consume();
                info!(
                    %direction,
                    entry = price,
                    stop_loss = decision.stop_loss,
                    take_profit = decision.take_profit,
                    order_id = ?receipt.order_id,
                    "trade fired"
                );
                self.announce(&format!(
                    "SILVER BULLET {direction} FIRED\nEntry: {price}\nSL: {} | TP: {}\nZone: {}-{}",
                    decision.stop_loss, decision.take_profit, zone.bottom, zone.top
                ))
                .await;
                TickOutcome::Fired(decision)
            }
            Err(e) => {
                let reason = e.to_string();
                if self.settings.failure_policy == DispatchFailurePolicy::Consume {
                    self.day.consume();
                }
                warn!(%reason, policy = ?self.settings.failure_policy, "order dispatch failed");
                self.announce(&format!("Order failed: {reason}")).await;
                TickOutcome::DispatchFailed { reason }
            }
        }
    }
}

/// Drives the engine at a fixed cadence until `shutdown` flips.
///
/// The cadence is intentionally a cooperative timer tick: decisions
/// happen on a minutes-scale window and gain nothing from event-driven
/// machinery. Missed ticks are skipped, not replayed.
pub async fn run_entry_loop<F, D, N>(
    mut engine: EntryEngine<F, D, N>,
    tick_every: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    F: CandleFeed,
    D: OrderDispatcher,
    N: Notifier,
{
    let mut ticker = interval(tick_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_secs = tick_every.as_secs(), "entry loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = engine.on_tick(Local::now()).await;
                debug!(?outcome, "tick complete");
            }
            _ = shutdown.changed() => {
                info!("entry loop stopping");
                return;
            }
        }
    }
}
