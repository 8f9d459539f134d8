//! Heatmap Module
//!
//! Rolls normalized observations up into category tables and
//! capitalization-weighted baskets with breadth and composite statistics.

pub mod bands;
pub mod basket;
pub mod rollup;
pub mod weights;

pub use bands::HeatBand;
pub use basket::{aggregate_basket, Bias, BreadthTally, CompositeStats};
pub use rollup::{rollup, GroupSummary, RowInput, SummaryRow};
pub use weights::{capitalization_weights, resolve_weights, to_crore, ConstituentWeight, WeightSource};
