use chrono::Duration;
use std::collections::BTreeSet;

use crate::PulseError;

const DEFAULT_SCALED_INSTRUMENTS: &[&str] = &["^TNX"];

const DEFAULT_HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "rbi", "fed", "federal reserve", "inflation", "cpi", "gdp", "rate hike", "rate cut",
    "repo rate", "recession", "crisis", "war", "sanction", "tariff", "default", "budget",
    "crash", "emergency",
];

const DEFAULT_LOW_IMPACT_KEYWORDS: &[&str] = &[
    "may", "might", "could", "likely", "expected to", "opinion", "preview", "outlook",
    "analysts say", "explainer",
];

const DEFAULT_LOOKBACK_HOURS: i64 = 48;
const DEFAULT_PRICE_CACHE_TTL_SECS: i64 = 900;
const DEFAULT_CAP_CACHE_TTL_SECS: i64 = 1800;

/// Settings injected into every pipeline component at construction
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Symbols quoted at 10x their conventional unit (e.g. ^TNX)
    pub scaled_instruments: BTreeSet<String>,
    pub high_impact_keywords: Vec<String>,
    pub low_impact_keywords: Vec<String>,
    pub lookback_window: Duration,
    pub price_cache_ttl: Duration,
    pub capitalization_cache_ttl: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scaled_instruments: DEFAULT_SCALED_INSTRUMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            high_impact_keywords: normalize_keywords(DEFAULT_HIGH_IMPACT_KEYWORDS.iter().copied()),
            low_impact_keywords: normalize_keywords(DEFAULT_LOW_IMPACT_KEYWORDS.iter().copied()),
            lookback_window: Duration::hours(DEFAULT_LOOKBACK_HOURS),
            price_cache_ttl: Duration::seconds(DEFAULT_PRICE_CACHE_TTL_SECS),
            capitalization_cache_ttl: Duration::seconds(DEFAULT_CAP_CACHE_TTL_SECS),
        }
    }
}

impl PipelineConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, PulseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PulseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PULSE_SCALED_INSTRUMENTS") {
            config.scaled_instruments = split_list(&raw).map(str::to_string).collect();
        }
        if let Some(raw) = lookup("PULSE_HIGH_IMPACT_KEYWORDS") {
            config.high_impact_keywords = normalize_keywords(split_list(&raw));
        }
        if let Some(raw) = lookup("PULSE_LOW_IMPACT_KEYWORDS") {
            config.low_impact_keywords = normalize_keywords(split_list(&raw));
        }
        if let Some(raw) = lookup("PULSE_NEWS_LOOKBACK_HOURS") {
            let hours = parse_positive("PULSE_NEWS_LOOKBACK_HOURS", &raw)?;
            config.lookback_window =
                in_range("PULSE_NEWS_LOOKBACK_HOURS", Duration::try_hours(hours))?;
        }
        if let Some(raw) = lookup("PULSE_PRICE_CACHE_TTL_SECS") {
            let secs = parse_positive("PULSE_PRICE_CACHE_TTL_SECS", &raw)?;
            config.price_cache_ttl =
                in_range("PULSE_PRICE_CACHE_TTL_SECS", Duration::try_seconds(secs))?;
        }
        if let Some(raw) = lookup("PULSE_CAP_CACHE_TTL_SECS") {
            let secs = parse_positive("PULSE_CAP_CACHE_TTL_SECS", &raw)?;
            config.capitalization_cache_ttl =
                in_range("PULSE_CAP_CACHE_TTL_SECS", Duration::try_seconds(secs))?;
        }

        Ok(config)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Lower-case and de-duplicate, keeping first-seen order
fn normalize_keywords<'a>(keywords: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keywords
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}

fn parse_positive(key: &str, raw: &str) -> Result<i64, PulseError> {
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => Ok(v),
        Ok(v) => Err(PulseError::Config(format!("{key} must be positive, got {v}"))),
        Err(e) => Err(PulseError::Config(format!("{key}: {e}"))),
    }
}

fn in_range(key: &str, duration: Option<Duration>) -> Result<Duration, PulseError> {
    duration.ok_or_else(|| PulseError::Config(format!("{key} is out of range")))
}
