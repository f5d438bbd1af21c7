use std::fmt;

/// Direction of a detected imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Bullish,
    Bearish,
}

impl ZoneKind {
    pub fn direction(&self) -> Direction {
        match self {
            ZoneKind::Bullish => Direction::Long,
            ZoneKind::Bearish => Direction::Short,
        }
    }
}

/// A price range left untraded between two non-overlapping candle ranges.
///
/// Invariant: `top >= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub bottom: f64,
    pub top: f64,
}

/// Side of the trade derived from the zone kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Sign applied to the configured position size.
    pub fn sign(&self) -> i64 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}
