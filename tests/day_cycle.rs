//! Full-day simulations of the entry engine against scripted
//! collaborators: one fire per day, window gating, reset-on-rollover,
//! and both dispatch-failure policies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone};
use parking_lot::Mutex;

use silverbullet::engine::engine::{
    DispatchFailurePolicy, EngineSettings, EntryEngine, TickOutcome,
};
use silverbullet::engine::window::EntryWindow;
use silverbullet::execution::dispatcher::{DispatchError, OrderDispatcher};
use silverbullet::execution::types::{OrderReceipt, TradeDecision};
use silverbullet::journal::Journal;
use silverbullet::market::feed::{CandleFeed, FeedError};
use silverbullet::market::types::Candle;
use silverbullet::notify::Notifier;
use silverbullet::signal::risk::RiskPolicy;

// -----------------------
// Scripted collaborators
// -----------------------

/// Always serves the same bullish gap (zone 100–102) and price.
struct BullishFeed {
    price: f64,
    /// Ticks remaining during which every feed call fails.
    outage: AtomicUsize,
}

impl BullishFeed {
    fn new(price: f64) -> Self {
        Self {
            price,
            outage: AtomicUsize::new(0),
        }
    }

    fn in_outage(&self) -> bool {
        self.outage
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl CandleFeed for BullishFeed {
    async fn fetch_candles(&self, _: &str, _: u32) -> Result<Vec<Candle>, FeedError> {
        if self.in_outage() {
            return Err(FeedError::NoData);
        }
        Ok(vec![
            Candle::new(100.0, 98.0, 99.0, true),
            Candle::new(103.0, 99.0, 102.0, true),
            Candle::new(105.0, 102.0, 104.0, true),
        ])
    }

    async fn fetch_price(&self) -> Result<f64, FeedError> {
        Ok(self.price)
    }
}

/// Counts submissions; optionally rejects the first `fail_first` of them.
struct ScriptedDispatcher {
    calls: AtomicUsize,
    fail_first: usize,
}

impl ScriptedDispatcher {
    fn accepting() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: 0,
        }
    }

    fn rejecting_first(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first: n,
        }
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderDispatcher for ScriptedDispatcher {
    async fn submit(&self, _: &TradeDecision) -> Result<OrderReceipt, DispatchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            Err(DispatchError::Rejected {
                status: 400,
                reason: "FILL_OR_KILL_VIOLATION".into(),
            })
        } else {
            Ok(OrderReceipt {
                order_id: Some(format!("tx-{n}")),
            })
        }
    }
}

/// Records every notification for later inspection.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

// -----------------------
// Harness
// -----------------------

fn temp_journal(tag: &str) -> Journal {
    let path = std::env::temp_dir().join(format!(
        "silverbullet-daycycle-{}-{tag}.log",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    Journal::new(path)
}

fn settings(policy: DispatchFailurePolicy) -> EngineSettings {
    EngineSettings {
        window: EntryWindow::new(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
        ),
        risk: RiskPolicy {
            buffer: 1.5,
            reward_multiple: 3.0,
            position_size: 248,
            price_precision: 1,
        },
        proximity_tolerance: 10.0,
        failure_policy: policy,
    }
}

fn at(day: u32, hh: u32, mm: u32) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(
        &format!("2024-06-{day:02} {hh:02}:{mm:02}:00"),
        "%Y-%m-%d %H:%M:%S",
    )
    .unwrap();
    // Skip local times that do not exist (DST gaps in exotic zones).
    Local.from_local_datetime(&naive).earliest()
}

/// Drive one tick per minute across a whole local day.
async fn run_day(
    engine: &mut EntryEngine<BullishFeed, ScriptedDispatcher, RecordingNotifier>,
    day: u32,
) -> Vec<TickOutcome> {
    let mut outcomes = Vec::new();
    for hh in 0..24 {
        for mm in 0..60 {
            let Some(now) = at(day, hh, mm) else { continue };
            outcomes.push(engine.on_tick(now).await);
        }
    }
    outcomes
}

fn engine_for(
    feed: BullishFeed,
    dispatcher: ScriptedDispatcher,
    policy: DispatchFailurePolicy,
    tag: &str,
) -> (
    EntryEngine<BullishFeed, ScriptedDispatcher, RecordingNotifier>,
    Arc<ScriptedDispatcher>,
    Arc<RecordingNotifier>,
) {
    let dispatcher = Arc::new(dispatcher);
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = EntryEngine::new(
        Arc::new(feed),
        dispatcher.clone(),
        notifier.clone(),
        temp_journal(tag),
        settings(policy),
        at(1, 0, 0).unwrap().date_naive(),
    );
    (engine, dispatcher, notifier)
}

// -----------------------
// Scenarios
// -----------------------

#[tokio::test]
async fn a_full_day_fires_exactly_once() {
    let (mut engine, dispatcher, _) = engine_for(
        BullishFeed::new(103.0),
        ScriptedDispatcher::accepting(),
        DispatchFailurePolicy::Consume,
        "single-fire",
    );

    let outcomes = run_day(&mut engine, 1).await;

    let fired = outcomes
        .iter()
        .filter(|o| matches!(o, TickOutcome::Fired(_)))
        .count();
    assert_eq!(fired, 1, "exactly one trade per calendar day");
    assert_eq!(dispatcher.count(), 1);
}

#[tokio::test]
async fn outside_the_window_nothing_ever_fires() {
    let (mut engine, dispatcher, _) = engine_for(
        BullishFeed::new(103.0),
        ScriptedDispatcher::accepting(),
        DispatchFailurePolicy::Consume,
        "window-gate",
    );

    for hh in 0..24 {
        for mm in 0..60 {
            // Every minute except the window itself.
            if hh == 10 && mm <= 15 {
                continue;
            }
            let Some(now) = at(1, hh, mm) else { continue };
            let outcome = engine.on_tick(now).await;
            assert_eq!(outcome, TickOutcome::OutsideWindow);
        }
    }
    assert_eq!(dispatcher.count(), 0);
}

#[tokio::test]
async fn consecutive_days_each_fire_once() {
    let (mut engine, dispatcher, notifier) = engine_for(
        BullishFeed::new(103.0),
        ScriptedDispatcher::accepting(),
        DispatchFailurePolicy::Consume,
        "three-days",
    );

    for day in 1..=3 {
        run_day(&mut engine, day).await;
    }

    assert_eq!(dispatcher.count(), 3);

    // The engine was constructed armed for day 1; days 2 and 3 each
    // announce one re-arm, no matter how many ticks they contain.
    let rearm_notes = notifier
        .messages
        .lock()
        .iter()
        .filter(|m| m.contains("New day"))
        .count();
    assert_eq!(rearm_notes, 2);
}

#[tokio::test]
async fn consume_policy_gives_up_for_the_day_after_a_rejection() {
    let (mut engine, dispatcher, _) = engine_for(
        BullishFeed::new(103.0),
        ScriptedDispatcher::rejecting_first(usize::MAX),
        DispatchFailurePolicy::Consume,
        "consume-policy",
    );

    let outcomes = run_day(&mut engine, 1).await;

    assert_eq!(dispatcher.count(), 1, "one attempt spends the day");
    assert!(
        outcomes
            .iter()
            .any(|o| matches!(o, TickOutcome::DispatchFailed { .. }))
    );
    assert!(!outcomes.iter().any(|o| matches!(o, TickOutcome::Fired(_))));
}

#[tokio::test]
async fn rearm_policy_retries_until_the_broker_accepts() {
    let (mut engine, dispatcher, _) = engine_for(
        BullishFeed::new(103.0),
        ScriptedDispatcher::rejecting_first(2),
        DispatchFailurePolicy::Rearm,
        "rearm-policy",
    );

    let outcomes = run_day(&mut engine, 1).await;

    // Two rejected attempts, then a fill, then quiet.
    assert_eq!(dispatcher.count(), 3);
    let fired = outcomes
        .iter()
        .filter(|o| matches!(o, TickOutcome::Fired(_)))
        .count();
    assert_eq!(fired, 1);
}

#[tokio::test]
async fn a_feed_outage_delays_but_does_not_lose_the_entry() {
    // The feed is only consulted on armed in-window ticks; five failed
    // fetches cover 10:00–10:04, so 10:05 is the first clean look.
    let feed = BullishFeed::new(103.0);
    feed.outage.store(5, Ordering::SeqCst);

    let (mut engine, dispatcher, _) = engine_for(
        feed,
        ScriptedDispatcher::accepting(),
        DispatchFailurePolicy::Consume,
        "outage",
    );

    let outcomes = run_day(&mut engine, 1).await;

    assert_eq!(dispatcher.count(), 1, "fires later in the same window");
    assert!(
        outcomes
            .iter()
            .any(|o| matches!(o, TickOutcome::DataUnavailable))
    );
    assert!(outcomes.iter().any(|o| matches!(o, TickOutcome::Fired(_))));
}

#[tokio::test]
async fn stale_zones_never_commit_capital() {
    // Zone is 100–102, tolerance 10; price 115 stays out of reach all day.
    let (mut engine, dispatcher, notifier) = engine_for(
        BullishFeed::new(115.0),
        ScriptedDispatcher::accepting(),
        DispatchFailurePolicy::Consume,
        "stale-zone",
    );

    let outcomes = run_day(&mut engine, 1).await;

    assert_eq!(dispatcher.count(), 0);
    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, TickOutcome::PatternOutOfZone))
        .count();
    assert_eq!(rejected, 16, "every in-window tick re-evaluates the gate");
    assert!(
        notifier
            .messages
            .lock()
            .iter()
            .any(|m| m.contains("not in zone"))
    );
}
