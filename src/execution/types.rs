use serde::{Deserialize, Serialize};

use crate::signal::types::Direction;

/// The one decision the engine may emit per day: a concrete,
/// fully-priced market order. Invariants: |units| equals the configured
/// position size and the sign matches the direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeDecision {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub units: i64,
}

/// Broker acknowledgement of a submitted order.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    /// Transaction id reported by the broker, when the response could
    /// be parsed.
    pub order_id: Option<String>,
}

/// Request body for `POST /v3/accounts/{account}/orders`.
#[derive(Debug, Serialize)]
pub struct OrderEnvelope<'a> {
    pub order: MarketOrder<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrder<'a> {
    pub instrument: &'a str,
    pub units: String,
    #[serde(rename = "type")]
    pub order_type: &'a str,
    pub time_in_force: &'a str,
    pub stop_loss_on_fill: PriceDirective,
    pub take_profit_on_fill: PriceDirective,
}

/// Dependent-order price, serialized as a decimal string at the
/// instrument's precision.
#[derive(Debug, Serialize)]
pub struct PriceDirective {
    pub price: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateResponse {
    pub order_create_transaction: Option<TransactionRef>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRef {
    pub id: String,
}
