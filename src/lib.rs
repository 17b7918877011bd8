//! Sepsafe - early sepsis-risk prediction
//!
//! Eight vital signs go in as one comma-separated line; a sepsis probability,
//! a risk band and an advisory come out, and the last twelve probabilities
//! are kept for a trend chart.
//!
//! ```rust,ignore
//! use sepsafe::{AppConfig, Pipeline, Session};
//!
//! let config = AppConfig::load(None)?;
//! let mut session = Session::new(Pipeline::from_config(&config)?);
//! let assessment = session.predict("80,98,70,18,7,1,37,250")?;
//! println!("{:.2} {}", assessment.probability, assessment.advisory());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod risk;
pub mod scaler;
pub mod trend;
pub mod vitals;
pub mod window;

pub use config::AppConfig;
pub use engine::{GbdtEngine, InferenceEngine, ModelFormat};
pub use error::{ErrorKind, FormatError, PredictError, PredictResult};
pub use pipeline::{Pipeline, PredictionWorker, Session, View};
pub use risk::{Assessment, RiskBand};
pub use scaler::{ScalerParams, ScalerStore};
pub use trend::{TrendBuffer, TREND_CAPACITY};
pub use vitals::{Vital, VitalReading};
pub use window::InferenceWindow;
