use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::market::feed::{CandleFeed, FeedError};
use crate::market::oanda::OandaEnv;
use crate::market::oanda::types::{CandleQuery, CandlesEnvelope, RawCandle};
use crate::market::types::Candle;
use crate::signal::risk::round_to_precision;

/// Granularity used to sample the current price: the mid close of the
/// single most recent one-minute bar.
const PRICE_GRANULARITY: &str = "M1";

#[derive(Clone)]
pub struct OandaClient {
    http: Client,
    host: String,
    api_key: String,
    instrument: String,
    price_precision: u32,
}

impl OandaClient {
    pub fn new(
        env: OandaEnv,
        api_key: String,
        instrument: String,
        price_precision: u32,
    ) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            host: env.rest_host().to_string(),
            api_key,
            instrument,
            price_precision,
        })
    }

    #[instrument(
        skip(self),
        fields(instrument = %self.instrument),
        level = "debug"
    )]
    async fn candles(&self, granularity: &str, count: u32) -> Result<Vec<Candle>, FeedError> {
        let url = format!("{}/v3/instruments/{}/candles", self.host, self.instrument);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&CandleQuery {
                count,
                granularity,
                price: "M",
            })
            .send()
            .await?
            .error_for_status()?;

        let envelope: CandlesEnvelope = resp.json().await?;

        debug!(
            candle_count = envelope.candles.len(),
            granularity, "oanda candles fetched"
        );

        envelope.candles.into_iter().map(to_candle).collect()
    }
}

fn to_candle(raw: RawCandle) -> Result<Candle, FeedError> {
    let mid = raw
        .mid
        .ok_or_else(|| FeedError::Malformed("candle missing mid prices".into()))?;

    Ok(Candle {
        high: mid.h.parse()?,
        low: mid.l.parse()?,
        close: mid.c.parse()?,
        complete: raw.complete,
    })
}

#[async_trait]
impl CandleFeed for OandaClient {
    async fn fetch_candles(&self, granularity: &str, count: u32) -> Result<Vec<Candle>, FeedError> {
        self.candles(granularity, count).await
    }

    async fn fetch_price(&self) -> Result<f64, FeedError> {
        let bars = self.candles(PRICE_GRANULARITY, 1).await?;
        let last = bars.last().ok_or(FeedError::NoData)?;
        Ok(round_to_precision(last.close, self.price_precision))
    }
}
