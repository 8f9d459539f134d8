//! Runs one dashboard refresh cycle: fetch, normalize, aggregate, classify,
//! score. Nothing but the fetch cache survives between cycles.

use chrono::{DateTime, Utc};
use heatmap::{aggregate_basket, rollup, GroupSummary, RowInput};
use impact_classifier::NewsWindow;
use market_mood::{score_mood, MoodScore, MoodSignals};
use price_normalizer::PriceNormalizer;
use pulse_core::{
    Extraction, Headline, MarketDataSource, NewsItem, NewsSource, PipelineConfig, PriceSeries,
    Unavailable,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub mod cache;
pub mod layout;

pub use cache::TtlCache;
pub use layout::{BasketDef, DashboardLayout, GroupDef, MoodSymbols, NewsFeed, SymbolEntry};

/// A symbol dropped from this cycle, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Everything the presentation layer needs for one page load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub groups: Vec<GroupSummary>,
    pub baskets: Vec<GroupSummary>,
    pub news: Vec<NewsItem>,
    pub mood: MoodScore,
    pub dropped: Vec<DroppedSymbol>,
}

pub struct PulseOrchestrator {
    market_data: Arc<dyn MarketDataSource>,
    news_source: Arc<dyn NewsSource>,
    layout: DashboardLayout,
    normalizer: PriceNormalizer,
    news_window: NewsWindow,
    /// Price series per symbol set (15-min TTL by default)
    price_cache: TtlCache<HashMap<String, PriceSeries>>,
    /// Capitalizations per basket (30-min TTL by default)
    cap_cache: TtlCache<HashMap<String, f64>>,
}

impl PulseOrchestrator {
    pub fn new(
        market_data: Arc<dyn MarketDataSource>,
        news_source: Arc<dyn NewsSource>,
        layout: DashboardLayout,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            market_data,
            news_source,
            layout,
            normalizer: PriceNormalizer::from_config(config),
            news_window: NewsWindow::from_config(config),
            price_cache: TtlCache::new(config.price_cache_ttl),
            cap_cache: TtlCache::new(config.capitalization_cache_ttl),
        }
    }

    /// Run one cycle as of `now`. Never fails: every collaborator error
    /// degrades to unavailable symbols or an empty feed.
    pub async fn refresh(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        let symbols = self.layout.price_symbols();
        tracing::info!("Starting refresh cycle for {} symbols", symbols.len());

        let (series_result, capitalizations, headlines) = tokio::join!(
            self.get_series(&symbols, now),
            self.get_capitalizations(now),
            self.get_headlines(),
        );

        let extractions: HashMap<String, Extraction> = match series_result {
            Ok(series) => self
                .normalizer
                .normalize_all(&symbols, &series)
                .into_iter()
                .collect(),
            Err(reason) => symbols
                .iter()
                .map(|s| (s.clone(), Err(Unavailable::FetchFailed(reason.clone()))))
                .collect(),
        };

        let groups: Vec<GroupSummary> = self
            .layout
            .groups
            .iter()
            .map(|g| {
                let inputs: Vec<RowInput> = g
                    .entries
                    .iter()
                    .map(|e| RowInput::new(&e.name, &e.symbol, lookup(&extractions, &e.symbol)))
                    .collect();
                rollup(&g.label, &inputs)
            })
            .collect();

        let baskets: Vec<GroupSummary> = self
            .layout
            .baskets
            .iter()
            .map(|b| {
                let inputs: Vec<RowInput> = b
                    .entries()
                    .into_iter()
                    .map(|e| {
                        let cap = capitalizations.get(&e.symbol).copied();
                        RowInput::new(e.name, e.symbol.clone(), lookup(&extractions, &e.symbol))
                            .with_capitalization(cap)
                    })
                    .collect();
                aggregate_basket(&b.label, &inputs, &b.fallback_by_symbol())
            })
            .collect();

        let news = self.news_window.select(headlines, now);

        let mood_symbols = &self.layout.mood;
        let mood = score_mood(&MoodSignals::from_extractions(
            &lookup(&extractions, &mood_symbols.volatility),
            &lookup(&extractions, &mood_symbols.bond_yield),
            &lookup(&extractions, &mood_symbols.equity),
        ));

        let mut dropped: Vec<DroppedSymbol> = symbols
            .iter()
            .filter_map(|s| match extractions.get(s) {
                Some(Err(reason)) => Some(DroppedSymbol {
                    symbol: s.clone(),
                    reason: reason.to_string(),
                }),
                _ => None,
            })
            .collect();
        dropped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        tracing::info!(
            "Refresh complete: {} of {} symbols available, {} headlines, mood {}",
            symbols.len() - dropped.len(),
            symbols.len(),
            news.len(),
            mood.label()
        );

        DashboardSnapshot {
            generated_at: now,
            groups,
            baskets,
            news,
            mood,
            dropped,
        }
    }

    /// Fetch all series in one batch (cached). Errors become a reason string.
    async fn get_series(
        &self,
        symbols: &[String],
        now: DateTime<Utc>,
    ) -> Result<HashMap<String, PriceSeries>, String> {
        let cache_key = TtlCache::<()>::key_for(symbols);
        if let Some(series) = self.price_cache.get(&cache_key, now) {
            tracing::debug!("Price cache hit ({} series)", series.len());
            return Ok(series);
        }

        match self.market_data.fetch_series(symbols).await {
            Ok(series) => {
                self.price_cache.insert(cache_key, series.clone(), now);
                Ok(series)
            }
            Err(e) => {
                tracing::warn!("Price fetch failed, all symbols unavailable this cycle: {}", e);
                Err(e.to_string())
            }
        }
    }

    /// Capitalizations for every basket (cached per basket). A failed basket
    /// simply contributes no capitalizations.
    async fn get_capitalizations(&self, now: DateTime<Utc>) -> HashMap<String, f64> {
        let mut all = HashMap::new();

        for basket in &self.layout.baskets {
            let symbols = basket.symbols();
            let cache_key = TtlCache::<()>::key_for(&symbols);

            let caps = match self.cap_cache.get(&cache_key, now) {
                Some(caps) => caps,
                None => match self.market_data.fetch_capitalizations(&symbols).await {
                    Ok(caps) => {
                        self.cap_cache.insert(cache_key, caps.clone(), now);
                        caps
                    }
                    Err(e) => {
                        tracing::warn!("Capitalization fetch failed for {}: {}", basket.label, e);
                        HashMap::new()
                    }
                },
            };
            all.extend(caps);
        }

        all
    }

    /// Headlines from every feed; uncategorized ones take their feed's category
    async fn get_headlines(&self) -> Vec<Headline> {
        let mut headlines = Vec::new();

        for feed in &self.layout.news_feeds {
            match self.news_source.fetch_headlines(&feed.feed_id).await {
                Ok(items) => headlines.extend(items.into_iter().map(|mut h| {
                    if h.category.is_empty() {
                        h.category = feed.category.clone();
                    }
                    h
                })),
                Err(e) => tracing::warn!("News feed '{}' failed: {}", feed.feed_id, e),
            }
        }

        headlines
    }
}

fn lookup(extractions: &HashMap<String, Extraction>, symbol: &str) -> Extraction {
    extractions
        .get(symbol)
        .cloned()
        .unwrap_or(Err(Unavailable::NotFound))
}
