//! Order submission boundary.
//!
//! The engine talks to a trait; the OANDA implementation hides
//! authentication, payload shape and error formats. Failures are
//! normalized into `DispatchError` values so the caller can decide
//! whether the day is spent or stays armed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::execution::types::{
    MarketOrder, OrderCreateResponse, OrderEnvelope, OrderReceipt, PriceDirective, TradeDecision,
};
use crate::market::oanda::OandaEnv;

/// Longest rejection body kept in logs and notifications.
const MAX_REASON_LEN: usize = 200;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },
}

/// Abstraction over the broker's order endpoint.
#[async_trait]
pub trait OrderDispatcher: Send + Sync + 'static {
    /// Submit `decision` as a market order, fill-or-kill, with
    /// stop-loss and take-profit attached on fill.
    async fn submit(&self, decision: &TradeDecision) -> Result<OrderReceipt, DispatchError>;
}

pub struct OandaDispatcher {
    http: Client,
    host: String,
    api_key: String,
    account_id: String,
    instrument: String,
    price_precision: u32,
}

impl OandaDispatcher {
    pub fn new(
        env: OandaEnv,
        api_key: String,
        account_id: String,
        instrument: String,
        price_precision: u32,
    ) -> Result<Self, DispatchError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            host: env.rest_host().to_string(),
            api_key,
            account_id,
            instrument,
            price_precision,
        })
    }

    fn price_field(&self, value: f64) -> PriceDirective {
        PriceDirective {
            price: format!("{value:.prec$}", prec = self.price_precision as usize),
        }
    }
}

#[async_trait]
impl OrderDispatcher for OandaDispatcher {
    #[instrument(
        skip(self, decision),
        fields(instrument = %self.instrument, units = decision.units)
    )]
    async fn submit(&self, decision: &TradeDecision) -> Result<OrderReceipt, DispatchError> {
        let url = format!("{}/v3/accounts/{}/orders", self.host, self.account_id);

        let body = OrderEnvelope {
            order: MarketOrder {
                instrument: &self.instrument,
                units: decision.units.to_string(),
                order_type: "MARKET",
                time_in_force: "FOK",
                stop_loss_on_fill: self.price_field(decision.stop_loss),
                take_profit_on_fill: self.price_field(decision.take_profit),
            },
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let reason = truncate_reason(resp.text().await.unwrap_or_default());
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        // The broker has accepted at this point; an unparseable success
        // body must still count as a fill, or a rearm policy would
        // double-enter.
        let parsed = resp
            .json::<OrderCreateResponse>()
            .await
            .unwrap_or_default();
        let order_id = parsed.order_create_transaction.map(|tx| tx.id);

        debug!(?order_id, "order accepted");

        Ok(OrderReceipt { order_id })
    }
}

fn truncate_reason(body: String) -> String {
    if body.len() > MAX_REASON_LEN {
        let mut end = MAX_REASON_LEN;
        while !body.is_char_boundary(end) {
            end += 1;
        }
        format!("{}…", &body[..end])
    } else {
        body
    }
}
