//! Price Series Normalizer
//!
//! Turns a raw closing-price series into a `PriceObservation`, or explains why
//! it could not.

use pulse_core::{PipelineConfig, PriceObservation, PriceSeries, Unavailable};
pub use pulse_core::Extraction;
use rust_decimal::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Scale factor for instruments quoted at 10x their conventional unit
const SCALED_DIVISOR: Decimal = Decimal::TEN;

pub struct PriceNormalizer {
    scaled_instruments: BTreeSet<String>,
}

impl PriceNormalizer {
    pub fn new(scaled_instruments: BTreeSet<String>) -> Self {
        Self { scaled_instruments }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.scaled_instruments.clone())
    }

    pub fn is_scaled(&self, symbol: &str) -> bool {
        self.scaled_instruments.contains(symbol)
    }

    /// Normalize one symbol's series.
    ///
    /// Uses the last two valid closes. A missing series, fewer than two valid
    /// closes, a zero previous close or a change outside the `Decimal` range
    /// all yield `Unavailable`.
    pub fn normalize(&self, symbol: &str, series: Option<&PriceSeries>) -> Extraction {
        let series = series.ok_or(Unavailable::NotFound)?;

        let closes: Vec<f64> = series.valid_closes().collect();
        let [.., previous, current] = closes.as_slice() else {
            return Err(Unavailable::InsufficientHistory {
                valid_points: closes.len(),
            });
        };

        // Keep the exact binary value so halfway-looking closes such as 2.675
        // (stored as 2.67499..) round the way the float does
        let mut previous = Decimal::from_f64_retain(*previous).ok_or(Unavailable::InvalidPrice)?;
        let mut current = Decimal::from_f64_retain(*current).ok_or(Unavailable::InvalidPrice)?;

        if self.is_scaled(symbol) {
            previous /= SCALED_DIVISOR;
            current /= SCALED_DIVISOR;
        }

        PriceObservation::new(previous, current)
    }

    /// Normalize every requested symbol, preserving request order.
    ///
    /// Symbols absent from `series` come back as `Unavailable::NotFound`.
    pub fn normalize_all(
        &self,
        symbols: &[String],
        series: &HashMap<String, PriceSeries>,
    ) -> Vec<(String, Extraction)> {
        symbols
            .iter()
            .map(|symbol| {
                let extraction = self.normalize(symbol, series.get(symbol));
                if let Err(reason) = &extraction {
                    tracing::debug!("Dropping {} this cycle: {}", symbol, reason);
                }
                (symbol.clone(), extraction)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pulse_core::{percent_change, PricePoint};
    use rust_decimal_macros::dec;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    fn normalizer() -> PriceNormalizer {
        PriceNormalizer::new(["^TNX".to_string()].into_iter().collect())
    }

    #[test]
    fn test_two_point_series() {
        let obs = normalizer()
            .normalize("A", Some(&series("A", &[100.0, 95.0])))
            .unwrap();
        assert_eq!(obs.previous_close, dec!(100.00));
        assert_eq!(obs.current_price, dec!(95.00));
        assert_eq!(obs.percent_change, dec!(-5.00));
    }

    #[test]
    fn test_uses_last_two_valid_closes() {
        let s = series("GC=F", &[1990.0, 2001.0, f64::NAN, 2010.0, f64::NAN]);
        let obs = normalizer().normalize("GC=F", Some(&s)).unwrap();
        assert_eq!(obs.previous_close, dec!(2001.00));
        assert_eq!(obs.current_price, dec!(2010.00));
        assert_eq!(obs.percent_change, dec!(0.45));
    }

    #[test]
    fn test_single_point_is_unavailable() {
        let result = normalizer().normalize("A", Some(&series("A", &[100.0, f64::NAN])));
        assert_eq!(result, Err(Unavailable::InsufficientHistory { valid_points: 1 }));
    }

    #[test]
    fn test_missing_series_is_unavailable() {
        assert_eq!(normalizer().normalize("A", None), Err(Unavailable::NotFound));
    }

    #[test]
    fn test_zero_previous_close_is_unavailable() {
        let result = normalizer().normalize("A", Some(&series("A", &[0.0, 4.0])));
        assert_eq!(result, Err(Unavailable::ZeroPreviousClose));
    }

    #[test]
    fn test_scaled_instrument_divided_before_rounding() {
        let raw = series("^TNX", &[42.57, 43.11]);
        let obs = normalizer().normalize("^TNX", Some(&raw)).unwrap();

        let expected = PriceObservation::new(
            Decimal::from_f64_retain(42.57).unwrap() / dec!(10),
            Decimal::from_f64_retain(43.11).unwrap() / dec!(10),
        )
        .unwrap();
        assert_eq!(obs, expected);
        assert_eq!(obs.previous_close, dec!(4.26));
        assert_eq!(obs.current_price, dec!(4.31));
    }

    #[test]
    fn test_unscaled_symbol_untouched() {
        let obs = normalizer()
            .normalize("^NSEI", Some(&series("^NSEI", &[42.57, 43.11])))
            .unwrap();
        assert_eq!(obs.previous_close, dec!(42.57));
    }

    #[test]
    fn test_huge_finite_close_is_unavailable() {
        let result = normalizer().normalize("A", Some(&series("A", &[1.0, 1e27])));
        assert_eq!(result, Err(Unavailable::InvalidPrice));

        let result = normalizer().normalize("A", Some(&series("A", &[1.0, 1e30])));
        assert_eq!(result, Err(Unavailable::InvalidPrice));
    }

    #[test]
    fn test_rounding_follows_stored_float() {
        // 2.675 is stored just below the midpoint, 2.665 just above
        let obs = normalizer()
            .normalize("A", Some(&series("A", &[2.675, 2.665])))
            .unwrap();
        assert_eq!(obs.previous_close, dec!(2.67));
        assert_eq!(obs.current_price, dec!(2.67));
        assert!(obs.is_unchanged());
    }

    #[test]
    fn test_percent_change_recomputes_from_rounded_prices() {
        let obs = normalizer()
            .normalize("X", Some(&series("X", &[1523.456, 1519.994])))
            .unwrap();
        assert_eq!(
            obs.percent_change,
            percent_change(obs.previous_close, obs.current_price).unwrap()
        );
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let mut map = HashMap::new();
        map.insert("B".to_string(), series("B", &[10.0, 11.0]));
        map.insert("A".to_string(), series("A", &[10.0, 9.0]));

        let symbols = vec!["B".to_string(), "C".to_string(), "A".to_string()];
        let results = normalizer().normalize_all(&symbols, &map);

        let order: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].1, Err(Unavailable::NotFound));
    }
}
