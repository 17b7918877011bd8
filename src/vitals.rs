//! Vital-sign input parsing and validation
//!
//! The prediction form takes one comma-separated line holding eight values
//! in a fixed order: HR, O2Sat, MAP, Resp, WBC, Lactate, Temp, Platelets.
//! Each value must sit inside a physiological band before it is allowed
//! anywhere near the model.

use crate::error::{FormatError, PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight variables the model was trained on, in input order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vital {
    /// Heart rate (beats/min)
    HeartRate,
    /// Pulse oximetry (%)
    O2Sat,
    /// Mean arterial pressure (mm Hg)
    MeanArterialPressure,
    /// Respiration rate (breaths/min)
    RespirationRate,
    /// Leukocyte count (count x 10^3/uL)
    Wbc,
    /// Lactic acid (mg/dL)
    Lactate,
    /// Temperature (deg C)
    Temperature,
    /// Platelet count (count x 10^3/uL)
    Platelets,
}

impl Vital {
    pub const COUNT: usize = 8;

    pub const ALL: [Vital; Vital::COUNT] = [
        Vital::HeartRate,
        Vital::O2Sat,
        Vital::MeanArterialPressure,
        Vital::RespirationRate,
        Vital::Wbc,
        Vital::Lactate,
        Vital::Temperature,
        Vital::Platelets,
    ];

    /// Short label used on the input form
    pub fn label(self) -> &'static str {
        match self {
            Self::HeartRate => "HR",
            Self::O2Sat => "O2Sat",
            Self::MeanArterialPressure => "MAP",
            Self::RespirationRate => "Resp",
            Self::Wbc => "WBC",
            Self::Lactate => "Lactate",
            Self::Temperature => "Temp",
            Self::Platelets => "Platelets",
        }
    }

    /// Inclusive valid band `(min, max)`
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::HeartRate => (30.0, 220.0),
            Self::O2Sat => (50.0, 100.0),
            Self::MeanArterialPressure => (40.0, 200.0),
            Self::RespirationRate => (10.0, 50.0),
            Self::Wbc => (1.0, 50.0),
            Self::Lactate => (0.0, 20.0),
            Self::Temperature => (30.0, 42.0),
            Self::Platelets => (50.0, 500.0),
        }
    }

    pub fn contains(self, value: f32) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Position of this variable in the input line
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&v| v == self)
            .unwrap_or_default()
    }

    /// "HR,O2Sat,MAP,..." for prompts
    pub fn order_hint() -> String {
        Self::ALL
            .iter()
            .map(|v| v.label())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Eight validated raw values, one per [`Vital`], in input order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalReading {
    values: [f32; Vital::COUNT],
}

impl VitalReading {
    /// Parse and range-check a comma-separated line.
    ///
    /// Token count is checked first, then every token is parsed, then every
    /// value is range-checked; the first failure wins.
    pub fn parse(input: &str) -> PredictResult<Self> {
        let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
        if tokens.len() != Vital::COUNT {
            return Err(FormatError::WrongCount {
                found: tokens.len(),
            }
            .into());
        }

        let mut values = [0.0f32; Vital::COUNT];
        for (i, (slot, token)) in values.iter_mut().zip(&tokens).enumerate() {
            *slot = token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| FormatError::NotANumber {
                    index: i,
                    token: (*token).to_string(),
                })?;
        }

        Self::from_values(values)
    }

    /// Range-check values that were already parsed
    pub fn from_values(values: [f32; Vital::COUNT]) -> PredictResult<Self> {
        for (index, (&vital, &value)) in Vital::ALL.iter().zip(&values).enumerate() {
            if !vital.contains(value) {
                return Err(PredictError::Range {
                    index,
                    vital,
                    value,
                });
            }
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32; Vital::COUNT] {
        &self.values
    }

    pub fn get(&self, vital: Vital) -> f32 {
        self.values[vital.index()]
    }
}
