//! Imbalance (gap) detection over a short run of completed candles.
//!
//! The detector is a pure function: same candles in, same zone out.
//! It looks at the three most recent completed bars c0, c1, c2
//! (oldest-first). The middle bar is a structural separator only;
//! its values do not enter the comparison.

use crate::market::types::Candle;
use crate::signal::types::{Zone, ZoneKind};

/// Detect a directional imbalance in `candles` (ordered oldest-first).
///
/// Returns `None` when fewer than three completed candles are supplied
/// or when the outer candle ranges overlap.
pub fn detect(candles: &[Candle]) -> Option<Zone> {
    let completed: Vec<&Candle> = candles.iter().filter(|c| c.complete).collect();

    let [c0, _c1, c2] = completed.last_chunk::<3>()?;

    if c2.low > c0.high {
        return Some(Zone {
            kind: ZoneKind::Bullish,
            bottom: c0.high,
            top: c2.low,
        });
    }

    if c2.high < c0.low {
        return Some(Zone {
            kind: ZoneKind::Bearish,
            bottom: c2.high,
            top: c0.low,
        });
    }

    None
}
