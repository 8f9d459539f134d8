use pulse_core::{AssetImpact, Extraction, PriceObservation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BreadthTally, CompositeStats, ConstituentWeight, HeatBand};

/// One symbol's normalization outcome, as fed to an aggregation
#[derive(Debug, Clone)]
pub struct RowInput {
    /// Display name (e.g. "NIFTY", "RELIANCE")
    pub name: String,
    pub symbol: String,
    pub extraction: Extraction,
    pub capitalization: Option<f64>,
}

impl RowInput {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, extraction: Extraction) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            extraction,
            capitalization: None,
        }
    }

    pub fn with_capitalization(mut self, capitalization: Option<f64>) -> Self {
        self.capitalization = capitalization;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,
    pub symbol: String,
    pub observation: PriceObservation,
    pub band: HeatBand,
    /// Capitalization in crore, when known
    pub capitalization: Option<Decimal>,
    pub weight: Option<ConstituentWeight>,
    pub impact: Option<AssetImpact>,
}

impl SummaryRow {
    pub(crate) fn plain(name: &str, symbol: &str, observation: PriceObservation) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            observation,
            band: HeatBand::from_change(observation.percent_change),
            capitalization: None,
            weight: None,
            impact: None,
        }
    }
}

/// Ordered observations under a display label.
///
/// `breadth` and `composite` are only present for basket aggregations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub rows: Vec<SummaryRow>,
    pub breadth: Option<BreadthTally>,
    pub composite: Option<CompositeStats>,
}

impl GroupSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, symbol: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.symbol == symbol)
    }
}

/// Category table: valid observations in caller order, unavailable symbols omitted
pub fn rollup(label: &str, inputs: &[RowInput]) -> GroupSummary {
    let rows: Vec<SummaryRow> = inputs
        .iter()
        .filter_map(|input| {
            input
                .extraction
                .as_ref()
                .ok()
                .map(|obs| SummaryRow::plain(&input.name, &input.symbol, *obs))
        })
        .collect();

    tracing::debug!("{}: {} of {} symbols available", label, rows.len(), inputs.len());

    GroupSummary {
        label: label.to_string(),
        rows,
        breadth: None,
        composite: None,
    }
}
