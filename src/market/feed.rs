use async_trait::async_trait;
use thiserror::Error;

use crate::market::types::Candle;

/// Failures at the market-data boundary.
///
/// None of these may escape a tick: the engine converts every variant
/// into a "no result this tick" outcome at the call site.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed candle payload: {0}")]
    Malformed(String),

    #[error("price parse error: {0}")]
    Parse(#[from] std::num::ParseFloatError),

    #[error("feed returned no candles")]
    NoData,
}

/// Abstraction over the candle/price source.
///
/// Implementations must apply bounded timeouts internally; a slow or
/// broken transport surfaces as `FeedError`, never as a hang.
#[async_trait]
pub trait CandleFeed: Send + Sync + 'static {
    /// Fetch the most recent `count` candles at `granularity`,
    /// ordered oldest-first. Incomplete bars are included as-is;
    /// filtering is the detector's job.
    async fn fetch_candles(&self, granularity: &str, count: u32) -> Result<Vec<Candle>, FeedError>;

    /// Current price of the instrument, rounded to tick precision.
    async fn fetch_price(&self) -> Result<f64, FeedError>;
}
