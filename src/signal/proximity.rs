//! Price-proximity gate applied before committing capital to a zone.
//!
//! A zone detected several bars ago may already be far behind the
//! market; entering late inverts the risk profile. The gate accepts a
//! price only while it sits within `tolerance` of the zone, bounds
//! inclusive.

use crate::signal::types::Zone;

pub fn accept(zone: &Zone, price: f64, tolerance: f64) -> bool {
    zone.bottom - tolerance <= price && price <= zone.top + tolerance
}
