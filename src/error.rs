//! Error taxonomy for the prediction pipeline
//!
//! Every failure is terminal for the request that raised it. None of them
//! touch the trend history.

use crate::vitals::Vital;
use thiserror::Error;

/// Problems with the shape of the raw text, before any value is checked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("You must enter exactly {expected} values (got {found})", expected = Vital::COUNT)]
    WrongCount { found: usize },

    #[error("'{token}' is not a number (variable {})", .index + 1)]
    NotANumber { index: usize, token: String },
}

/// Errors that can abort a prediction request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("{0}")]
    Format(#[from] FormatError),

    #[error(
        "Value {value} out of range for variable {} ({vital}, valid {min}..={max})",
        .index + 1,
        min = .vital.range().0,
        max = .vital.range().1
    )]
    Range { index: usize, vital: Vital, value: f32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference error: {0}")]
    Inference(String),
}

/// Coarse category of a [`PredictError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Range,
    Config,
    Inference,
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::Range { .. } => ErrorKind::Range,
            Self::Config(_) => ErrorKind::Config,
            Self::Inference(_) => ErrorKind::Inference,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}

pub type PredictResult<T> = Result<T, PredictError>;
