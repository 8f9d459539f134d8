//! Capitalization Weights
//!
//! Each weight is a constituent's share of the basket's *known* capitalization.
//! Constituents without capitalization are left out; the remaining weights are
//! not renormalized to cover them.
//!
//! Shares are truncated to `FRACTION_DP` places and the largest constituent
//! takes the remainder, so capitalization weights sum to exactly one.

use pulse_core::round_2dp;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Decimal places kept on a capitalization share
const FRACTION_DP: u32 = 20;

/// Rupees per crore
const CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightSource {
    Capitalization,
    StaticFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituentWeight {
    pub symbol: String,
    /// Share of the basket, 0.0 to 1.0
    pub weight_fraction: Decimal,
    pub source: WeightSource,
}

impl ConstituentWeight {
    /// Weight on a 0-100 scale, rounded to 2 places
    pub fn weight_percent(&self) -> Decimal {
        round_2dp(self.weight_fraction * Decimal::ONE_HUNDRED)
    }
}

/// Usable capitalization: finite, positive and representable
fn known_capitalization(cap: Option<f64>) -> Option<Decimal> {
    cap.filter(|c| c.is_finite() && *c > 0.0)
        .and_then(Decimal::from_f64)
        .filter(|c| *c > Decimal::ZERO)
}

/// Weights from capitalizations, in input order.
///
/// Returns nothing when no constituent has a usable capitalization.
pub fn capitalization_weights(caps: &[(String, Option<f64>)]) -> Vec<ConstituentWeight> {
    let known: Vec<(&String, Decimal)> = caps
        .iter()
        .filter_map(|(symbol, cap)| known_capitalization(*cap).map(|c| (symbol, c)))
        .collect();

    let Some(total) = known
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, c)| acc.checked_add(*c))
    else {
        tracing::warn!("Basket capitalization overflows, treating it as unknown");
        return Vec::new();
    };
    if total.is_zero() {
        return Vec::new();
    }

    let mut weights: Vec<ConstituentWeight> = known
        .iter()
        .map(|(symbol, cap)| ConstituentWeight {
            symbol: (*symbol).clone(),
            weight_fraction: (*cap / total)
                .round_dp_with_strategy(FRACTION_DP, RoundingStrategy::ToZero),
            source: WeightSource::Capitalization,
        })
        .collect();

    // First largest cap absorbs the truncation remainder
    let largest = known
        .iter()
        .enumerate()
        .fold(0, |best, (i, (_, cap))| if *cap > known[best].1 { i } else { best });
    let others: Decimal = weights
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != largest)
        .map(|(_, w)| w.weight_fraction)
        .sum();
    weights[largest].weight_fraction = (Decimal::ONE - others).max(Decimal::ZERO);

    weights
}

/// Capitalization weights, or the static fallback when no capitalization is known.
///
/// Fallback fractions apply only to listed constituents and are never mixed
/// with capitalization weights.
pub fn resolve_weights(
    constituents: &[String],
    capitalizations: &HashMap<String, f64>,
    fallback: &BTreeMap<String, Decimal>,
) -> Vec<ConstituentWeight> {
    let caps: Vec<(String, Option<f64>)> = constituents
        .iter()
        .map(|s| (s.clone(), capitalizations.get(s).copied()))
        .collect();

    let weights = capitalization_weights(&caps);
    if !weights.is_empty() || fallback.is_empty() {
        return weights;
    }

    tracing::debug!("No capitalization known, using static fallback weights");
    constituents
        .iter()
        .filter_map(|symbol| {
            fallback
                .get(symbol)
                .filter(|w| !w.is_sign_negative() && **w <= Decimal::ONE)
                .map(|w| ConstituentWeight {
                    symbol: symbol.clone(),
                    weight_fraction: *w,
                    source: WeightSource::StaticFallback,
                })
        })
        .collect()
}

/// Raw capitalization expressed in crore, rounded to whole units
pub fn to_crore(cap: f64) -> Option<Decimal> {
    known_capitalization(Some(cap)).map(|c| (c / CRORE).round_dp(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn caps(pairs: &[(&str, Option<f64>)]) -> Vec<(String, Option<f64>)> {
        pairs.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn test_unknown_cap_excluded() {
        let weights = capitalization_weights(&caps(&[
            ("X", Some(100.0)),
            ("Y", Some(50.0)),
            ("Z", None),
        ]));

        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].weight_percent(), dec!(66.67));
        assert_eq!(weights[1].weight_percent(), dec!(33.33));
        assert!(weights.iter().all(|w| w.symbol != "Z"));
    }

    fn fraction_sum(weights: &[ConstituentWeight]) -> Decimal {
        weights.iter().map(|w| w.weight_fraction).sum()
    }

    #[test]
    fn test_known_weights_sum_to_exactly_one() {
        let baskets: Vec<Vec<(String, Option<f64>)>> = vec![
            caps(&[("X", Some(100.0)), ("Y", Some(50.0))]),
            caps(&[("A", Some(1.0)), ("B", Some(1.0)), ("C", Some(4.0))]),
            caps(&[("A", Some(1.0)), ("B", Some(1.0)), ("C", Some(1.0))]),
            caps(&[("A", Some(3.0)), ("B", Some(7.0)), ("C", Some(11.0)), ("D", Some(13.0))]),
            caps(&[("A", Some(1.95e13)), ("B", Some(1.4e13)), ("C", Some(7.3e12))]),
        ];

        for basket in &baskets {
            let weights = capitalization_weights(basket);
            assert_eq!(fraction_sum(&weights), Decimal::ONE, "{:?}", basket);
            assert!(weights.iter().all(|w| !w.weight_fraction.is_sign_negative()));
        }
    }

    #[test]
    fn test_unknown_cap_never_pushes_sum_past_one() {
        let weights = capitalization_weights(&caps(&[
            ("A", Some(1.0)),
            ("B", None),
            ("C", Some(1.0)),
            ("D", Some(1.0)),
        ]));

        assert_eq!(weights.len(), 3);
        assert!(fraction_sum(&weights) <= Decimal::ONE);
        assert_eq!(weights[0].weight_percent(), dec!(33.33));
    }

    #[test]
    fn test_largest_constituent_takes_remainder() {
        let weights = capitalization_weights(&caps(&[
            ("A", Some(1.0)),
            ("B", Some(1.0)),
            ("C", Some(1.0)),
        ]));
        assert_eq!(weights[1].weight_fraction, weights[2].weight_fraction);
        assert!(weights[0].weight_fraction > weights[1].weight_fraction);
    }

    #[test]
    fn test_overflowing_total_treated_as_unknown() {
        let weights = capitalization_weights(&caps(&[
            ("A", Some(7.0e28)),
            ("B", Some(7.0e28)),
        ]));
        assert!(weights.is_empty());
    }

    #[test]
    fn test_removing_uncapitalized_constituent_keeps_weights() {
        let with_z = capitalization_weights(&caps(&[
            ("X", Some(300.0)),
            ("Z", None),
            ("Y", Some(100.0)),
        ]));
        let without_z = capitalization_weights(&caps(&[("X", Some(300.0)), ("Y", Some(100.0))]));
        assert_eq!(with_z, without_z);
    }

    #[test]
    fn test_bad_caps_treated_as_unknown() {
        let weights = capitalization_weights(&caps(&[
            ("X", Some(f64::NAN)),
            ("Y", Some(-5.0)),
            ("Z", Some(0.0)),
        ]));
        assert!(weights.is_empty());
    }

    #[test]
    fn test_fallback_only_when_nothing_known() {
        let constituents = vec!["X".to_string(), "Y".to_string()];
        let fallback: BTreeMap<String, Decimal> =
            [("X".to_string(), dec!(0.6)), ("Y".to_string(), dec!(0.4))].into_iter().collect();

        let weights = resolve_weights(&constituents, &HashMap::new(), &fallback);
        assert_eq!(weights.len(), 2);
        assert_eq!(fraction_sum(&weights), Decimal::ONE);
        assert!(weights.iter().all(|w| w.source == WeightSource::StaticFallback));

        let mut known = HashMap::new();
        known.insert("Y".to_string(), 10.0);
        let weights = resolve_weights(&constituents, &known, &fallback);
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].weight_fraction, Decimal::ONE);
        assert_eq!(weights[0].source, WeightSource::Capitalization);
    }

    #[test]
    fn test_out_of_range_fallback_ignored() {
        let constituents = vec!["X".to_string(), "Y".to_string()];
        let fallback: BTreeMap<String, Decimal> =
            [("X".to_string(), dec!(1.5)), ("Y".to_string(), dec!(-0.1))].into_iter().collect();

        assert!(resolve_weights(&constituents, &HashMap::new(), &fallback).is_empty());
    }

    #[test]
    fn test_crore_conversion() {
        assert_eq!(to_crore(1.9e12), Some(dec!(190000)));
        assert_eq!(to_crore(f64::NAN), None);
    }
}
