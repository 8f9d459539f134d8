use thiserror::Error;

/// Why a symbol produced no observation this cycle.
///
/// Every variant is recovered locally: the symbol is dropped from the cycle's
/// aggregates and nothing propagates to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    #[error("Symbol not found in market data")]
    NotFound,

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Insufficient history: {valid_points} valid points (need 2)")]
    InsufficientHistory { valid_points: usize },

    #[error("Price not representable as a decimal")]
    InvalidPrice,

    #[error("Previous close is zero")]
    ZeroPreviousClose,
}

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Market data error: {0}")]
    DataSource(String),

    #[error("News feed error: {0}")]
    NewsSource(String),

    #[error("Config error: {0}")]
    Config(String),
}
