//! Order-level derivation for a detected zone.
//!
//! Pure arithmetic: (direction, zone, entry price) plus a static policy
//! map to stop-loss, take-profit and signed units. The stop sits one
//! buffer beyond the far edge of the zone; the target is the stop
//! distance multiplied by the configured reward multiple.

use crate::signal::types::{Direction, Zone};

/// Static risk parameters for one instrument.
#[derive(Debug, Clone, Copy)]
pub struct RiskPolicy {
    /// Distance between the zone edge and the stop-loss, in price units.
    pub buffer: f64,

    /// Ratio of take-profit distance to stop-loss distance from entry.
    pub reward_multiple: f64,

    /// Unsigned order size; the direction supplies the sign.
    pub position_size: i64,

    /// Decimal places of the instrument's tick. All emitted prices are
    /// rounded to this precision.
    pub price_precision: u32,
}

/// Concrete order parameters ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub units: i64,
}

/// Round `value` to `decimals` decimal places.
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Derive stop-loss, take-profit and signed units for an entry at
/// `entry_price` against `zone`.
pub fn compute(
    direction: Direction,
    zone: &Zone,
    entry_price: f64,
    policy: &RiskPolicy,
) -> OrderLevels {
    let stop_loss = match direction {
        Direction::Long => zone.bottom - policy.buffer,
        Direction::Short => zone.top + policy.buffer,
    };
    let stop_loss = round_to_precision(stop_loss, policy.price_precision);

    let risk = (entry_price - stop_loss).abs();
    let take_profit = match direction {
        Direction::Long => entry_price + risk * policy.reward_multiple,
        Direction::Short => entry_price - risk * policy.reward_multiple,
    };
    let take_profit = round_to_precision(take_profit, policy.price_precision);

    OrderLevels {
        stop_loss,
        take_profit,
        units: direction.sign() * policy.position_size,
    }
}
