//! Probability banding
//!
//! Three bands with fixed cut points: below 0.5 is LOW, from 0.5 up to 0.7
//! is MODERATE, 0.7 and above is HIGH.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MODERATE_THRESHOLD: f32 = 0.5;
pub const HIGH_THRESHOLD: f32 = 0.7;

/// Sepsis-risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    /// Total over all inputs; values outside `[0, 1]` land in the nearest band.
    pub fn from_probability(p: f32) -> Self {
        if p < MODERATE_THRESHOLD {
            Self::Low
        } else if p < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            Self::Low => "Monitor the patient routinely.",
            Self::Moderate => "Reassess the patient.",
            Self::High => "Act immediately.",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    /// Model output in `[0, 1]`
    pub probability: f32,
    pub band: RiskBand,
}

impl Assessment {
    pub fn from_probability(probability: f32) -> Self {
        Self {
            probability,
            band: RiskBand::from_probability(probability),
        }
    }

    pub fn advisory(&self) -> &'static str {
        self.band.advisory()
    }
}
