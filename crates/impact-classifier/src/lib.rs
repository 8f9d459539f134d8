//! Impact Classifier
//!
//! Coarse keyword and threshold rules that flag macro-significant assets and
//! headlines. Intentionally crude: no learned model.

pub mod asset;
pub mod feed;
pub mod headline;

pub use asset::{asset_impact, asset_impact_score, HIGH_IMPACT_THRESHOLD, MEDIUM_IMPACT_THRESHOLD};
pub use feed::NewsWindow;
pub use headline::HeadlineClassifier;
