use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse bucket of a percent change, used to shade heatmap cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatBand {
    StrongUp,
    Up,
    Flat,
    Down,
    StrongDown,
}

impl HeatBand {
    pub fn from_change(percent_change: Decimal) -> Self {
        if percent_change > Decimal::ONE {
            HeatBand::StrongUp
        } else if percent_change > Decimal::ZERO {
            HeatBand::Up
        } else if percent_change < Decimal::NEGATIVE_ONE {
            HeatBand::StrongDown
        } else if percent_change < Decimal::ZERO {
            HeatBand::Down
        } else {
            HeatBand::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bands() {
        assert_eq!(HeatBand::from_change(dec!(1.01)), HeatBand::StrongUp);
        assert_eq!(HeatBand::from_change(dec!(1.00)), HeatBand::Up);
        assert_eq!(HeatBand::from_change(dec!(0)), HeatBand::Flat);
        assert_eq!(HeatBand::from_change(dec!(-0.4)), HeatBand::Down);
        assert_eq!(HeatBand::from_change(dec!(-1.00)), HeatBand::Down);
        assert_eq!(HeatBand::from_change(dec!(-2.5)), HeatBand::StrongDown);
    }
}
