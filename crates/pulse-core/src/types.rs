use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Unavailable;

/// One closing price in a symbol's series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Raw closing prices for one symbol, ascending by time.
///
/// Missing sessions are simply absent. Non-finite closes (NaN padding from a
/// batched download) are treated as missing by [`PriceSeries::valid_closes`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Closing prices with gaps dropped, in series order
    pub fn valid_closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close).filter(|c| c.is_finite())
    }
}

/// Outcome of normalizing one symbol
pub type Extraction = Result<PriceObservation, Unavailable>;

/// Canonical (previous, current, percent change) triple for one symbol.
///
/// Both prices are rounded to 2 places and `percent_change` is derived from
/// the rounded values, so it always recomputes exactly from the stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub previous_close: Decimal,
    pub current_price: Decimal,
    pub percent_change: Decimal,
}

impl PriceObservation {
    /// Round both prices, then derive the percent change from the rounded values
    pub fn new(previous_close: Decimal, current_price: Decimal) -> Result<Self, Unavailable> {
        let previous_close = round_2dp(previous_close);
        let current_price = round_2dp(current_price);
        let percent_change = percent_change(previous_close, current_price)?;

        Ok(Self {
            previous_close,
            current_price,
            percent_change,
        })
    }

    pub fn is_advance(&self) -> bool {
        self.percent_change > Decimal::ZERO
    }

    pub fn is_decline(&self) -> bool {
        self.percent_change < Decimal::ZERO
    }

    /// Exact zero, no tolerance band
    pub fn is_unchanged(&self) -> bool {
        self.percent_change.is_zero()
    }
}

/// Two decimal places, ties to even
pub fn round_2dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// `round(((current / previous) - 1) * 100, 2)`
///
/// A result outside the `Decimal` range is `Unavailable::InvalidPrice`.
pub fn percent_change(previous: Decimal, current: Decimal) -> Result<Decimal, Unavailable> {
    if previous.is_zero() {
        return Err(Unavailable::ZeroPreviousClose);
    }
    current
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
        .and_then(|delta| delta.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_2dp)
        .ok_or(Unavailable::InvalidPrice)
}

/// Market-moving significance of an asset move
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetImpact {
    Low,
    Medium,
    High,
}

impl AssetImpact {
    pub fn label(&self) -> &'static str {
        match self {
            AssetImpact::Low => "LOW",
            AssetImpact::Medium => "MEDIUM",
            AssetImpact::High => "HIGH",
        }
    }
}

/// Market-moving significance of a headline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadlineImpact {
    Low,
    Normal,
    High,
}

impl HeadlineImpact {
    pub fn label(&self) -> &'static str {
        match self {
            HeadlineImpact::Low => "LOW",
            HeadlineImpact::Normal => "NORMAL",
            HeadlineImpact::High => "HIGH",
        }
    }
}

/// Headline as delivered by a news feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    /// Filled from the feed definition when the source leaves it empty
    #[serde(default)]
    pub category: String,
    pub headline: String,
    pub publish_time: DateTime<Utc>,
    pub link: String,
}

/// Headline inside the lookback window, tagged with its impact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub category: String,
    pub headline: String,
    pub publish_time: DateTime<Utc>,
    pub link: String,
    pub impact: HeadlineImpact,
}

impl NewsItem {
    pub fn tagged(headline: Headline, impact: HeadlineImpact) -> Self {
        Self {
            category: headline.category,
            headline: headline.headline,
            publish_time: headline.publish_time,
            link: headline.link,
            impact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_observation_rounds_before_percent_change() {
        let obs = PriceObservation::new(dec!(100.004), dec!(101.006)).unwrap();
        assert_eq!(obs.previous_close, dec!(100.00));
        assert_eq!(obs.current_price, dec!(101.01));
        // 101.01 / 100.00 rather than 101.006 / 100.004
        assert_eq!(obs.percent_change, dec!(1.01));
    }

    #[test]
    fn test_observation_recomputes_from_stored_fields() {
        let obs = PriceObservation::new(dec!(22147.9), dec!(22013.35)).unwrap();
        let recomputed = percent_change(obs.previous_close, obs.current_price).unwrap();
        assert_eq!(obs.percent_change, recomputed);
    }

    #[test]
    fn test_zero_previous_close_is_unavailable() {
        assert_eq!(
            PriceObservation::new(dec!(0.001), dec!(5)),
            Err(Unavailable::ZeroPreviousClose)
        );
    }

    #[test]
    fn test_out_of_range_change_is_unavailable() {
        assert_eq!(
            percent_change(dec!(0.01), Decimal::MAX),
            Err(Unavailable::InvalidPrice)
        );
        assert_eq!(
            PriceObservation::new(dec!(1), Decimal::from_i128_with_scale(10_i128.pow(27), 0)),
            Err(Unavailable::InvalidPrice)
        );
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(round_2dp(dec!(2.675)), dec!(2.68));
        assert_eq!(round_2dp(dec!(2.665)), dec!(2.66));
        assert_eq!(round_2dp(dec!(-1.005)), dec!(-1.00));
    }

    #[test]
    fn test_direction_helpers() {
        let up = PriceObservation::new(dec!(10), dec!(11)).unwrap();
        let flat = PriceObservation::new(dec!(10), dec!(10)).unwrap();
        assert!(up.is_advance() && !up.is_decline() && !up.is_unchanged());
        assert!(flat.is_unchanged());
    }

    #[test]
    fn test_valid_closes_skip_gaps() {
        let now = Utc::now();
        let series = PriceSeries::new(
            "GC=F",
            vec![
                PricePoint { timestamp: now, close: 2010.5 },
                PricePoint { timestamp: now, close: f64::NAN },
                PricePoint { timestamp: now, close: 2022.0 },
            ],
        );
        assert_eq!(series.valid_closes().collect::<Vec<_>>(), vec![2010.5, 2022.0]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AssetImpact::Medium.label(), "MEDIUM");
        assert_eq!(HeadlineImpact::Normal.label(), "NORMAL");
    }
}
