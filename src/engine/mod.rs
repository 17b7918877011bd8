//! Model inference
//!
//! The classifier itself is opaque: it takes a standardized `[1, 12, 8]`
//! window and returns one probability. Anything that can do that implements
//! [`InferenceEngine`]; the shipped backend is [`GbdtEngine`].

mod boosted;

pub use boosted::GbdtEngine;

use crate::error::{PredictError, PredictResult};
use crate::window::InferenceWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A loaded binary classifier.
///
/// Loaded once per session and called from the prediction worker, so
/// implementations must be reentrant.
pub trait InferenceEngine: Send + Sync {
    /// Probability of sepsis for `window`
    fn predict(&self, window: &InferenceWindow) -> PredictResult<f32>;

    /// Short description for logs and `check`
    fn describe(&self) -> String {
        "unnamed engine".to_string()
    }
}

/// Serialized form of the model artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// gbdt-rs native JSON
    #[default]
    Gbdt,
    /// XGBoost JSON dump, `binary:logistic` objective
    Xgboost,
}

impl ModelFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gbdt" => Some(Self::Gbdt),
            "xgboost" | "xgb" => Some(Self::Xgboost),
            _ => None,
        }
    }
}

/// Load the model artifact at `path`
pub fn load_engine(path: &Path, format: ModelFormat) -> PredictResult<Arc<dyn InferenceEngine>> {
    let engine = match format {
        ModelFormat::Gbdt => GbdtEngine::load(path)?,
        ModelFormat::Xgboost => GbdtEngine::load_xgboost(path)?,
    };
    Ok(Arc::new(engine))
}

/// Reject engine output that is not a probability
pub fn check_probability(p: f32) -> PredictResult<f32> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(PredictError::inference(format!(
            "model returned {p}, expected a probability in [0, 1]"
        )))
    }
}
