//! Prediction pipeline
//!
//! One request runs the full chain:
//! 1. Parse and range-check the eight values
//! 2. Standardize with the session's scaler params
//! 3. Replicate into the `[1, 12, 8]` window
//! 4. Run the classifier
//! 5. Band the probability
//!
//! The first failing stage ends the request. The pipeline itself holds no
//! per-request state; history lives in [`Session`].

mod session;
mod worker;

pub use session::{Outcome, Session, View};
pub use worker::{Completed, PredictionWorker, RequestId};

use std::sync::Arc;
use tracing::debug;

use crate::config::AppConfig;
use crate::engine::{check_probability, load_engine, InferenceEngine};
use crate::error::PredictResult;
use crate::risk::Assessment;
use crate::scaler::ScalerStore;
use crate::vitals::VitalReading;
use crate::window::InferenceWindow;

/// Validation, windowing, inference and banding for one request.
pub struct Pipeline {
    scaler: ScalerStore,
    engine: Arc<dyn InferenceEngine>,
}

impl Pipeline {
    pub fn new(scaler: ScalerStore, engine: Arc<dyn InferenceEngine>) -> Self {
        Self { scaler, engine }
    }

    /// Load the model now and the scaler params on first use.
    pub fn from_config(config: &AppConfig) -> PredictResult<Self> {
        let engine = load_engine(&config.assets.model, config.assets.model_format)?;
        let scaler = ScalerStore::from_path(&config.assets.scaler_params);
        Ok(Self::new(scaler, engine))
    }

    /// Run the whole chain on one line of user input.
    pub fn run(&self, input: &str) -> PredictResult<Assessment> {
        let reading = VitalReading::parse(input)?;
        self.run_reading(&reading)
    }

    /// Run the chain on values that already passed validation.
    pub fn run_reading(&self, reading: &VitalReading) -> PredictResult<Assessment> {
        let params = self.scaler.get()?;
        let window = InferenceWindow::build(reading, params)?;
        let p = check_probability(self.engine.predict(&window)?)?;
        let assessment = Assessment::from_probability(p);
        debug!(
            "Predicted {:.4} ({}) for {:?}",
            p,
            assessment.band,
            reading.values()
        );
        Ok(assessment)
    }
}
