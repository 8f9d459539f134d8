//! Basket Aggregation
//!
//! Capitalization-weighted view of an equity universe: per-constituent weight
//! and impact, advance/decline/neutral breadth, and the weighted composite move.

use impact_classifier::asset_impact;
use pulse_core::round_2dp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{resolve_weights, rollup::SummaryRow, to_crore, GroupSummary, RowInput};

/// Advance/decline/neutral counts over valid observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadthTally {
    pub advances: usize,
    pub declines: usize,
    /// Percent change exactly zero
    pub neutral: usize,
}

impl BreadthTally {
    pub fn total(&self) -> usize {
        self.advances + self.declines + self.neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Flat,
}

impl Bias {
    pub fn from_change(weighted_change: Decimal) -> Self {
        if weighted_change > Decimal::ZERO {
            Bias::Bullish
        } else if weighted_change < Decimal::ZERO {
            Bias::Bearish
        } else {
            Bias::Flat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeStats {
    /// Sum of weight fraction x percent change, rounded to 2 places
    pub weighted_change: Decimal,
    /// Sum of weight fractions of constituents counted in `weighted_change`
    pub covered_weight: Decimal,
    pub bias: Bias,
}

/// Aggregate a basket in caller order.
///
/// Weights come from every constituent with known capitalization, whether or
/// not its price was available. Rows, breadth and composite only cover valid
/// observations. An empty basket yields empty rows and zero tallies.
pub fn aggregate_basket(
    label: &str,
    inputs: &[RowInput],
    fallback_weights: &BTreeMap<String, Decimal>,
) -> GroupSummary {
    let constituents: Vec<String> = inputs.iter().map(|i| i.symbol.clone()).collect();
    let capitalizations: HashMap<String, f64> = inputs
        .iter()
        .filter_map(|i| i.capitalization.map(|c| (i.symbol.clone(), c)))
        .collect();

    let weights: HashMap<String, _> = resolve_weights(&constituents, &capitalizations, fallback_weights)
        .into_iter()
        .map(|w| (w.symbol.clone(), w))
        .collect();

    let mut breadth = BreadthTally::default();
    let mut weighted_sum = Decimal::ZERO;
    let mut covered_weight = Decimal::ZERO;
    let mut rows = Vec::new();

    for input in inputs {
        let Ok(observation) = &input.extraction else {
            continue;
        };

        if observation.is_advance() {
            breadth.advances += 1;
        } else if observation.is_decline() {
            breadth.declines += 1;
        } else {
            breadth.neutral += 1;
        }

        let mut row = SummaryRow::plain(&input.name, &input.symbol, *observation);
        row.capitalization = input.capitalization.and_then(to_crore);

        if let Some(weight) = weights.get(&input.symbol) {
            match weight
                .weight_fraction
                .checked_mul(observation.percent_change)
                .and_then(|contribution| weighted_sum.checked_add(contribution))
            {
                Some(sum) => {
                    weighted_sum = sum;
                    covered_weight += weight.weight_fraction;
                }
                None => tracing::warn!(
                    "{}: {} move out of range, left out of the composite",
                    label,
                    input.symbol
                ),
            }
            row.impact = Some(asset_impact(weight.weight_percent(), observation.percent_change));
            row.weight = Some(weight.clone());
        }

        rows.push(row);
    }

    let weighted_change = round_2dp(weighted_sum);
    tracing::debug!(
        "{}: {} adv / {} dec / {} neutral, weighted change {}%",
        label,
        breadth.advances,
        breadth.declines,
        breadth.neutral,
        weighted_change
    );

    GroupSummary {
        label: label.to_string(),
        rows,
        breadth: Some(breadth),
        composite: Some(CompositeStats {
            weighted_change,
            covered_weight,
            bias: Bias::from_change(weighted_change),
        }),
    }
}
