//! Standardization parameters for the model input
//!
//! `scaler_params.json` carries the per-feature `mean` and `scale` the model
//! was trained with:
//!
//! ```json
//! {"mean": [8 numbers], "scale": [8 numbers]}
//! ```
//!
//! The store reads it on first use and keeps it for the rest of the session.

use crate::error::{PredictError, PredictResult};
use crate::vitals::Vital;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Per-feature `(mean, scale)`, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalerParams {
    mean: [f32; Vital::COUNT],
    scale: [f32; Vital::COUNT],
}

/// On-disk layout, checked before it becomes a `ScalerParams`
#[derive(Debug, Deserialize)]
struct RawScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl ScalerParams {
    pub fn new(mean: [f32; Vital::COUNT], scale: [f32; Vital::COUNT]) -> Self {
        Self { mean, scale }
    }

    /// Mean 0, scale 1: normalization leaves values untouched
    pub fn identity() -> Self {
        Self::new([0.0; Vital::COUNT], [1.0; Vital::COUNT])
    }

    pub fn from_json(json: &str) -> PredictResult<Self> {
        let raw: RawScalerParams = serde_json::from_str(json)
            .map_err(|e| PredictError::config(format!("malformed scaler params: {e}")))?;

        if raw.mean.len() != raw.scale.len() {
            return Err(PredictError::config(format!(
                "scaler mean has {} entries but scale has {}",
                raw.mean.len(),
                raw.scale.len()
            )));
        }
        if raw.mean.len() != Vital::COUNT {
            return Err(PredictError::config(format!(
                "scaler params must have {} entries, found {}",
                Vital::COUNT,
                raw.mean.len()
            )));
        }

        let params = Self {
            mean: std::array::from_fn(|i| raw.mean[i] as f32),
            scale: std::array::from_fn(|i| raw.scale[i] as f32),
        };
        for (name, values) in [("mean", &params.mean), ("scale", &params.scale)] {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(PredictError::config(format!(
                    "scaler {name} for {} is not representable as f32",
                    Vital::ALL[i]
                )));
            }
        }
        Ok(params)
    }

    pub fn load(path: &Path) -> PredictResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn mean(&self) -> &[f32; Vital::COUNT] {
        &self.mean
    }

    pub fn scale(&self) -> &[f32; Vital::COUNT] {
        &self.scale
    }

    /// First feature whose scale is zero, if any
    pub fn degenerate_feature(&self) -> Option<Vital> {
        self.scale
            .iter()
            .position(|&s| s == 0.0)
            .map(|i| Vital::ALL[i])
    }
}

enum ScalerSource {
    File(PathBuf),
    Inline(String),
}

/// Lazily loaded, session-lived scaler parameters
pub struct ScalerStore {
    source: ScalerSource,
    cached: OnceLock<ScalerParams>,
}

impl ScalerStore {
    /// Read from `path` on first use
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ScalerSource::File(path.into()),
            cached: OnceLock::new(),
        }
    }

    /// Parse `json` on first use
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            source: ScalerSource::Inline(json.into()),
            cached: OnceLock::new(),
        }
    }

    /// Already-loaded parameters
    pub fn preloaded(params: ScalerParams) -> Self {
        let cached = OnceLock::new();
        let _ = cached.set(params);
        Self {
            source: ScalerSource::Inline(String::new()),
            cached,
        }
    }

    /// Return the cached parameters, loading them on first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> PredictResult<&ScalerParams> {
        if let Some(params) = self.cached.get() {
            return Ok(params);
        }

        let params = match &self.source {
            ScalerSource::File(path) => {
                debug!("Loading scaler params from {}", path.display());
                ScalerParams::load(path)?
            }
            ScalerSource::Inline(json) => ScalerParams::from_json(json)?,
        };
        Ok(self.cached.get_or_init(|| params))
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Where the parameters come from, for diagnostics
    pub fn describe(&self) -> String {
        match &self.source {
            ScalerSource::File(path) => path.display().to_string(),
            ScalerSource::Inline(_) => "<inline>".to_string(),
        }
    }
}
