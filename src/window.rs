//! Model input assembly
//!
//! The classifier expects a `[1, 12, 8]` tensor: batch of one, twelve time
//! steps, eight standardized features. The form only collects a single
//! snapshot, so that snapshot is repeated across every time step.

use crate::error::{PredictError, PredictResult};
use crate::scaler::ScalerParams;
use crate::vitals::{Vital, VitalReading};

pub const BATCH: usize = 1;
pub const TIME_STEPS: usize = 12;
pub const FEATURES: usize = Vital::COUNT;

/// Fixed-shape model input, built fresh for every request
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceWindow {
    data: [[[f32; FEATURES]; TIME_STEPS]; BATCH],
}

impl InferenceWindow {
    /// Standardize `reading` with `params` and replicate it over all steps.
    ///
    /// A zero `scale` entry is a broken scaler file, not bad user input, so
    /// it is reported as a configuration error.
    pub fn build(reading: &VitalReading, params: &ScalerParams) -> PredictResult<Self> {
        if let Some(vital) = params.degenerate_feature() {
            return Err(PredictError::config(format!(
                "scale for {vital} (feature {}) is zero",
                vital.index() + 1
            )));
        }

        let raw = reading.values();
        let mean = params.mean();
        let scale = params.scale();
        let normalized: [f32; FEATURES] = std::array::from_fn(|f| (raw[f] - mean[f]) / scale[f]);
        if let Some(f) = normalized.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::config(format!(
                "standardized {} is not finite (mean {}, scale {})",
                Vital::ALL[f],
                mean[f],
                scale[f]
            )));
        }

        Ok(Self {
            data: [[normalized; TIME_STEPS]; BATCH],
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        [BATCH, TIME_STEPS, FEATURES]
    }

    pub fn get(&self, batch: usize, step: usize, feature: usize) -> f32 {
        self.data[batch][step][feature]
    }

    /// Row-major flattening: step-major, feature-minor
    pub fn flatten(&self) -> Vec<f32> {
        self.data
            .iter()
            .flat_map(|steps| steps.iter())
            .flat_map(|features| features.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn reading() -> VitalReading {
        VitalReading::parse("80,98,70,18,7,1,37,250").unwrap()
    }

    #[test]
    fn test_identity_scaler_copies_values() {
        let window = InferenceWindow::build(&reading(), &ScalerParams::identity()).unwrap();
        assert_eq!(window.shape(), [1, 12, 8]);
        for t in 0..TIME_STEPS {
            for (f, &raw) in reading().values().iter().enumerate() {
                assert_eq!(window.get(0, t, f), raw);
            }
        }
    }

    #[test]
    fn test_standardization_is_exact() {
        let params = ScalerParams::new(
            [84.5, 97.2, 78.0, 18.7, 11.0, 2.1, 36.9, 196.0],
            [17.1, 2.9, 16.4, 5.0, 7.6, 1.9, 0.77, 103.0],
        );
        let window = InferenceWindow::build(&reading(), &params).unwrap();
        let raw = reading();
        for t in 0..TIME_STEPS {
            for f in 0..FEATURES {
                let expected = (raw.values()[f] - params.mean()[f]) / params.scale()[f];
                assert_eq!(window.get(0, t, f), expected);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = ScalerParams::new([1.0; 8], [2.0; 8]);
        let a = InferenceWindow::build(&reading(), &params).unwrap();
        let b = InferenceWindow::build(&reading(), &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_scale_is_config_error() {
        let mut scale = [1.0; 8];
        scale[5] = 0.0;
        let params = ScalerParams::new([0.0; 8], scale);
        let err = InferenceWindow::build(&reading(), &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("Lactate"));
    }

    #[test]
    fn test_overflow_is_config_error() {
        let mut scale = [1.0; 8];
        scale[2] = 1e-30;
        let mut mean = [0.0; 8];
        mean[2] = 3e38;
        let err = InferenceWindow::build(&reading(), &ScalerParams::new(mean, scale)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("MAP"), "{err}");
    }

    #[test]
    fn test_flatten_order() {
        let params = ScalerParams::identity();
        let window = InferenceWindow::build(&reading(), &params).unwrap();
        let flat = window.flatten();
        assert_eq!(flat.len(), BATCH * TIME_STEPS * FEATURES);
        assert_eq!(&flat[..8], reading().values());
        assert_eq!(&flat[88..], reading().values());
    }
}
