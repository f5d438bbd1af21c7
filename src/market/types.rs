use serde::{Deserialize, Serialize};

/// One price bar at the feed's granularity, mid prices.
///
/// Only bars whose period has fully elapsed (`complete == true`) are
/// eligible for pattern detection; the in-progress bar still moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub complete: bool,
}

impl Candle {
    pub fn new(high: f64, low: f64, close: f64, complete: bool) -> Self {
        Self {
            high,
            low,
            close,
            complete,
        }
    }
}
