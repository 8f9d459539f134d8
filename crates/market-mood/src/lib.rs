//! Market Mood
//!
//! Counts how many of three reference signals point risk-on and maps the count
//! to a fixed label.

use pulse_core::{Extraction, PriceObservation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discrete market mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    RiskOff,
    Caution,
    ModerateRiskOn,
    StrongRiskOn,
}

impl Mood {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Mood::RiskOff,
            1 => Mood::Caution,
            2 => Mood::ModerateRiskOn,
            _ => Mood::StrongRiskOn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::RiskOff => "RISK OFF",
            Mood::Caution => "CAUTION",
            Mood::ModerateRiskOn => "MODERATE RISK ON",
            Mood::StrongRiskOn => "STRONG RISK ON",
        }
    }
}

/// Percent changes of the three reference instruments; `None` when unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSignals {
    pub volatility: Option<Decimal>,
    pub bond_yield: Option<Decimal>,
    pub equity: Option<Decimal>,
}

impl MoodSignals {
    /// Build from normalization outcomes, dropping unavailable ones
    pub fn from_extractions(volatility: &Extraction, bond_yield: &Extraction, equity: &Extraction) -> Self {
        let change = |e: &Extraction| e.as_ref().ok().map(|o: &PriceObservation| o.percent_change);
        Self {
            volatility: change(volatility),
            bond_yield: change(bond_yield),
            equity: change(equity),
        }
    }

    pub fn available(&self) -> usize {
        [self.volatility, self.bond_yield, self.equity]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

/// Risk-on count in [0, 3] plus its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodScore {
    pub score: u8,
    pub mood: Mood,
    /// How many of the three signals were available
    pub signals_available: u8,
}

impl MoodScore {
    pub fn label(&self) -> &'static str {
        self.mood.label()
    }
}

/// Score the mood.
///
/// Risk-on means volatility falling, yield falling, equity rising. An
/// unavailable signal never contributes, so it counts as risk-off.
pub fn score_mood(signals: &MoodSignals) -> MoodScore {
    let risk_on = [
        signals.volatility.is_some_and(|c| c < Decimal::ZERO),
        signals.bond_yield.is_some_and(|c| c < Decimal::ZERO),
        signals.equity.is_some_and(|c| c > Decimal::ZERO),
    ];
    let score = risk_on.iter().filter(|on| **on).count() as u8;
    let signals_available = signals.available() as u8;

    if signals_available < 3 {
        tracing::warn!(
            "Mood scored with {} of 3 signals; missing ones count as risk-off",
            signals_available
        );
    }

    MoodScore {
        score,
        mood: Mood::from_score(score),
        signals_available,
    }
}
