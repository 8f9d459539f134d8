use pulse_core::AssetImpact;
use rust_decimal::Decimal;

/// Score above which a move is HIGH impact
pub const HIGH_IMPACT_THRESHOLD: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
/// Score above which a move is MEDIUM impact
pub const MEDIUM_IMPACT_THRESHOLD: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// `abs(weight_percent * percent_change)`, both on a 0-100 scale.
///
/// `None` when the product leaves the `Decimal` range.
pub fn asset_impact_score(weight_percent: Decimal, percent_change: Decimal) -> Option<Decimal> {
    weight_percent.checked_mul(percent_change).map(|s| s.abs())
}

/// Tier an asset move by basket weight and percent change
pub fn asset_impact(weight_percent: Decimal, percent_change: Decimal) -> AssetImpact {
    // An unrepresentable score is far past every threshold
    let Some(score) = asset_impact_score(weight_percent, percent_change) else {
        return AssetImpact::High;
    };
    if score > HIGH_IMPACT_THRESHOLD {
        AssetImpact::High
    } else if score > MEDIUM_IMPACT_THRESHOLD {
        AssetImpact::Medium
    } else {
        AssetImpact::Low
    }
}
