use thiserror::Error;

/// Fatal startup errors.
///
/// Every runtime failure in this system degrades to a no-op tick;
/// configuration problems are the one class that stops the process,
/// before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: String, value: String },

    #[error("entry window end {end} precedes start {start}")]
    WindowInverted { start: String, end: String },
}
