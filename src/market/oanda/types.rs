use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /v3/instruments/{instrument}/candles`.
#[derive(Debug, Deserialize)]
pub struct CandlesEnvelope {
    pub candles: Vec<RawCandle>,
}

/// Candle as delivered on the wire. Prices arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct RawCandle {
    pub complete: bool,
    /// Present because candles are requested with `price=M`.
    pub mid: Option<RawMid>,
}

#[derive(Debug, Deserialize)]
pub struct RawMid {
    pub h: String,
    pub l: String,
    pub c: String,
}

/// Query string for the candles endpoint.
#[derive(Debug, Serialize)]
pub struct CandleQuery<'a> {
    pub count: u32,
    pub granularity: &'a str,
    pub price: &'a str,
}
