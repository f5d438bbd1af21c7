pub mod client;
pub mod types;

use std::str::FromStr;

/// OANDA deployment the credentials belong to. Selects the REST host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OandaEnv {
    #[default]
    Practice,
    Live,
}

impl OandaEnv {
    pub fn rest_host(&self) -> &'static str {
        match self {
            OandaEnv::Practice => "https://api-fxpractice.oanda.com",
            OandaEnv::Live => "https://api-fxtrade.oanda.com",
        }
    }
}

impl FromStr for OandaEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practice" => Ok(OandaEnv::Practice),
            "live" => Ok(OandaEnv::Live),
            other => Err(format!("unknown OANDA environment: {other}")),
        }
    }
}
