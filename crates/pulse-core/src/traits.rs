use async_trait::async_trait;
use std::collections::HashMap;

use crate::{Headline, PriceSeries, PulseError};

/// Supplies price series and capitalizations.
///
/// A symbol missing from the returned map is treated as unavailable for the
/// cycle; an `Err` marks every requested symbol unavailable.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_series(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, PriceSeries>, PulseError>;

    /// Market-capitalization-like values, refreshed on a slower cadence than prices
    async fn fetch_capitalizations(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, f64>, PulseError>;
}

/// Supplies headlines for a feed. No ordering is assumed.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_headlines(&self, feed_id: &str) -> Result<Vec<Headline>, PulseError>;
}
