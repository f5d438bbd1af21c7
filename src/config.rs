use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveTime;

use crate::engine::engine::DispatchFailurePolicy;
use crate::engine::window::EntryWindow;
use crate::error::ConfigError;
use crate::market::oanda::OandaEnv;

#[derive(Clone, Debug)]
pub struct AppConfig {
    // =========================
    // Broker credentials
    // =========================
    /// OANDA REST API token. Required; the process refuses to start
    /// without it.
    pub api_key: String,

    /// OANDA account the orders are booked against. Required.
    pub account_id: String,

    /// Which OANDA deployment the credentials belong to
    /// (practice or live). Selects the REST host.
    pub env: OandaEnv,

    // =========================
    // Instrument & sizing
    // =========================
    /// The single instrument this process trades.
    pub instrument: String,

    /// Unsigned order size; the trade direction supplies the sign.
    pub position_size: i64,

    /// Decimal places of the instrument's tick. Every price sent to
    /// the broker is rounded and formatted at this precision.
    pub price_precision: u32,

    // =========================
    // Entry window & risk
    // =========================
    /// Daily clock window (local time, both bounds inclusive) inside
    /// which the single entry attempt may happen.
    pub window: EntryWindow,

    /// Distance between the zone edge and the stop-loss, price units.
    pub entry_buffer: f64,

    /// Ratio of take-profit distance to stop-loss distance.
    pub reward_multiple: f64,

    /// Maximum distance between current price and a detected zone
    /// before the zone is considered stale and skipped.
    pub proximity_tolerance: f64,

    /// What happens to the day when the broker rejects the order:
    /// `consume` spends it, `rearm` allows a retry in the same window.
    pub failure_policy: DispatchFailurePolicy,

    // =========================
    // Runtime
    // =========================
    /// Cadence of the decision loop.
    pub poll_interval: Duration,

    /// Listen port of the status surface.
    pub port: u16,

    /// Where the append-only journal lives.
    pub journal_path: PathBuf,

    // =========================
    // Notifications
    // =========================
    /// Telegram bot token. Required.
    pub telegram_token: String,

    /// Telegram chat the notifications go to. Required.
    pub chat_id: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    /// All missing required names are collected and reported together.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let api_key = require(&lookup, "OANDA_API_KEY", &mut missing);
        let account_id = require(&lookup, "OANDA_ACCOUNT_ID", &mut missing);
        let telegram_token = require(&lookup, "TELEGRAM_TOKEN", &mut missing);
        let chat_id = require(&lookup, "CHAT_ID", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let start = time(&lookup, "ENTRY_START", "10:00")?;
        let end = time(&lookup, "ENTRY_END", "10:15")?;
        if end < start {
            return Err(ConfigError::WindowInverted {
                start: start.format("%H:%M").to_string(),
                end: end.format("%H:%M").to_string(),
            });
        }

        Ok(Self {
            api_key,
            account_id,
            env: parsed(&lookup, "OANDA_ENV", OandaEnv::Practice)?,
            instrument: lookup("INSTRUMENT").unwrap_or_else(|| "US100_USD".to_string()),
            position_size: parsed(&lookup, "POSITION_SIZE", 248)?,
            price_precision: parsed(&lookup, "PRICE_PRECISION", 1)?,
            window: EntryWindow::new(start, end),
            entry_buffer: parsed(&lookup, "ENTRY_BUFFER", 1.5)?,
            reward_multiple: parsed(&lookup, "REWARD_MULTIPLE", 3.0)?,
            proximity_tolerance: parsed(&lookup, "PROXIMITY_TOLERANCE", 10.0)?,
            failure_policy: parsed(
                &lookup,
                "DISPATCH_FAILURE_POLICY",
                DispatchFailurePolicy::Consume,
            )?,
            poll_interval: Duration::from_secs(parsed(&lookup, "POLL_INTERVAL_SECS", 15u64)?),
            port: parsed(&lookup, "PORT", 5000)?,
            journal_path: PathBuf::from(
                lookup("JOURNAL_PATH").unwrap_or_else(|| "silver.log".to_string()),
            ),
            telegram_token,
            chat_id,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    missing: &mut Vec<String>,
) -> String {
    match lookup(name) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn time(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<NaiveTime, ConfigError> {
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        value: raw,
    })
}
