//! JSON fixture standing in for the market-data and news collaborators.

use anyhow::{Context, Result};
use async_trait::async_trait;
use pulse_core::{Headline, MarketDataSource, NewsSource, PricePoint, PriceSeries, PulseError};
use pulse_orchestrator::DashboardLayout;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    /// Closing prices per symbol, ascending by time
    #[serde(default)]
    pub series: HashMap<String, Vec<PricePoint>>,
    #[serde(default)]
    pub capitalizations: HashMap<String, f64>,
    /// Headlines per feed id
    #[serde(default)]
    pub headlines: HashMap<String, Vec<Headline>>,
    /// Overrides the built-in dashboard layout
    #[serde(default)]
    pub layout: Option<DashboardLayout>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[async_trait]
impl MarketDataSource for Fixture {
    async fn fetch_series(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, PriceSeries>, PulseError> {
        Ok(symbols
            .iter()
            .filter_map(|s| {
                self.series
                    .get(s)
                    .map(|points| (s.clone(), PriceSeries::new(s.clone(), points.clone())))
            })
            .collect())
    }

    async fn fetch_capitalizations(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, f64>, PulseError> {
        Ok(symbols
            .iter()
            .filter_map(|s| self.capitalizations.get(s).map(|c| (s.clone(), *c)))
            .collect())
    }
}

#[async_trait]
impl NewsSource for Fixture {
    async fn fetch_headlines(&self, feed_id: &str) -> Result<Vec<Headline>, PulseError> {
        self.headlines
            .get(feed_id)
            .cloned()
            .ok_or_else(|| PulseError::NewsSource(format!("unknown feed '{feed_id}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "series": {
            "^NSEI": [
                {"timestamp": "2024-06-03T10:00:00Z", "close": 22000.0},
                {"timestamp": "2024-06-04T10:00:00Z", "close": 22176.0}
            ]
        },
        "capitalizations": {"RELIANCE.NS": 1.95e13},
        "headlines": {
            "economy": [
                {"headline": "RBI holds rates", "publish_time": "2024-06-04T08:00:00Z", "link": "https://news.example.com/1"}
            ]
        }
    }"#;

    #[tokio::test]
    async fn test_fixture_serves_requested_symbols() {
        let fixture = Fixture::parse(SAMPLE).unwrap();
        let symbols = vec!["^NSEI".to_string(), "^TNX".to_string()];

        let series = fixture.fetch_series(&symbols).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series["^NSEI"].points.len(), 2);

        let caps = fixture
            .fetch_capitalizations(&["RELIANCE.NS".to_string()])
            .await
            .unwrap();
        assert_eq!(caps["RELIANCE.NS"], 1.95e13);
    }

    #[tokio::test]
    async fn test_unknown_feed_is_error() {
        let fixture = Fixture::parse(SAMPLE).unwrap();
        assert_eq!(fixture.fetch_headlines("economy").await.unwrap().len(), 1);
        assert!(fixture.fetch_headlines("sports").await.is_err());
    }

    #[test]
    fn test_empty_fixture() {
        let fixture = Fixture::parse("{}").unwrap();
        assert!(fixture.series.is_empty());
        assert!(fixture.layout.is_none());
    }
}
