//! Gradient-boosted classifier backend
//!
//! Wraps `gbdt::gradient_boost::GBDT`. The window is flattened step-major
//! into 96 features and handed to the model as one test sample. Models use
//! the `LogLikelyhood` loss, so `predict` already returns a probability.

use std::io::{BufReader, Cursor};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use tracing::{debug, info};

use super::{check_probability, InferenceEngine};
use crate::error::{PredictError, PredictResult};
use crate::window::InferenceWindow;

pub struct GbdtEngine {
    model: GBDT,
    origin: String,
}

impl GbdtEngine {
    /// Load a model in gbdt-rs native JSON format from disk.
    pub fn load(path: &Path) -> PredictResult<Self> {
        let path_str = path_str(path)?;
        let model = GBDT::load_model(path_str).map_err(|e| {
            PredictError::inference(format!("failed to load model {}: {e}", path.display()))
        })?;
        info!("Loaded GBDT model from {}", path.display());
        Ok(Self::with_origin(model, path))
    }

    /// Load an XGBoost JSON dump from disk (`binary:logistic`).
    pub fn load_xgboost(path: &Path) -> PredictResult<Self> {
        let path_str = path_str(path)?;
        let model = GBDT::from_xgboost_dump(path_str, "binary:logistic").map_err(|e| {
            PredictError::inference(format!(
                "failed to load XGBoost dump {}: {e}",
                path.display()
            ))
        })?;
        info!("Loaded XGBoost dump from {}", path.display());
        Ok(Self::with_origin(model, path))
    }

    /// Parse a model from a gbdt-rs JSON string.
    pub fn from_json(json: &str) -> PredictResult<Self> {
        let model: GBDT = serde_json::from_str(json)
            .map_err(|e| PredictError::inference(format!("failed to parse GBDT JSON: {e}")))?;
        Ok(Self {
            model,
            origin: "<inline gbdt>".to_string(),
        })
    }

    /// Parse a model from an XGBoost JSON dump string.
    pub fn from_xgboost_json(json: &str) -> PredictResult<Self> {
        let reader = BufReader::new(Cursor::new(json));
        let model = GBDT::from_xgboost_reader(reader, "binary:logistic")
            .map_err(|e| PredictError::inference(format!("failed to parse XGBoost JSON: {e}")))?;
        Ok(Self {
            model,
            origin: "<inline xgboost>".to_string(),
        })
    }

    /// Wrap an already-built model.
    pub fn from_model(model: GBDT) -> Self {
        Self {
            model,
            origin: "<in-memory>".to_string(),
        }
    }

    fn with_origin(model: GBDT, path: &Path) -> Self {
        Self {
            model,
            origin: path.display().to_string(),
        }
    }
}

fn path_str(path: &Path) -> PredictResult<&str> {
    path.to_str()
        .ok_or_else(|| PredictError::inference("invalid UTF-8 in model path"))
}

impl InferenceEngine for GbdtEngine {
    fn predict(&self, window: &InferenceWindow) -> PredictResult<f32> {
        let data = vec![Data::new_test_data(window.flatten(), None)];

        // gbdt indexes features without bounds checks of its own; a model
        // trained on a different input width panics instead of erroring.
        let preds = catch_unwind(AssertUnwindSafe(|| self.model.predict(&data))).map_err(|_| {
            PredictError::inference(format!(
                "model {} rejected a {:?} window",
                self.origin,
                window.shape()
            ))
        })?;

        let p = preds
            .first()
            .copied()
            .ok_or_else(|| PredictError::inference("model produced no output"))?;
        debug!("GBDT raw output {p}");
        check_probability(p)
    }

    fn describe(&self) -> String {
        format!("gbdt ({})", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{load_engine, ModelFormat};
    use crate::error::ErrorKind;
    use crate::scaler::ScalerParams;
    use crate::vitals::VitalReading;
    use crate::window::{FEATURES, TIME_STEPS};
    use gbdt::config::Config;

    /// Two well separated clusters labelled -1 and +1
    fn train_small(feature_size: usize) -> GBDT {
        let mut cfg = Config::new();
        cfg.set_feature_size(feature_size);
        cfg.set_max_depth(3);
        cfg.set_iterations(10);
        cfg.set_shrinkage(0.3);
        cfg.set_loss("LogLikelyhood");
        cfg.set_debug(false);
        cfg.set_training_optimization_level(2);
        cfg.set_min_leaf_size(1);

        let mut training = Vec::new();
        for i in 0..20 {
            let jitter = i as f32 * 0.01;
            training.push(Data::new_training_data(
                vec![-1.0 + jitter; feature_size],
                1.0,
                -1.0,
                None,
            ));
            training.push(Data::new_training_data(
                vec![2.0 + jitter; feature_size],
                1.0,
                1.0,
                None,
            ));
        }

        let mut model = GBDT::new(&cfg);
        model.fit(&mut training);
        model
    }

    /// One stump on standardized HR: below 0 scores -1.2, otherwise +1.4.
    const XGB_DUMP: &str = r#"0.0
[{"nodeid": 0, "depth": 0, "split": "f0", "split_condition": 0.0, "yes": 1, "no": 2, "missing": 1,
  "children": [{"nodeid": 1, "leaf": -1.2}, {"nodeid": 2, "leaf": 1.4}]}]
"#;

    fn window(line: &str, params: &ScalerParams) -> InferenceWindow {
        InferenceWindow::build(&VitalReading::parse(line).unwrap(), params).unwrap()
    }

    #[test]
    fn test_predict_returns_probability() {
        let engine = GbdtEngine::from_model(train_small(TIME_STEPS * FEATURES));
        let params = ScalerParams::new(
            [84.5, 97.2, 78.0, 18.7, 11.0, 2.1, 36.9, 196.0],
            [17.1, 2.9, 16.4, 5.0, 7.6, 1.9, 0.77, 103.0],
        );
        let p = engine.predict(&window("80,98,70,18,7,1,37,250", &params)).unwrap();
        assert!((0.0..=1.0).contains(&p), "got {p}");
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let engine = GbdtEngine::from_model(train_small(TIME_STEPS * FEATURES));
        let w = window("80,98,70,18,7,1,37,250", &ScalerParams::identity());
        let a = engine.predict(&w).unwrap();
        let b = engine.predict(&w).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = train_small(TIME_STEPS * FEATURES);
        model.save_model(path.to_str().unwrap()).unwrap();

        let engine = GbdtEngine::load(&path).unwrap();
        assert!(engine.describe().contains("model.json"));
        let w = window("120,90,60,30,20,6,39,100", &ScalerParams::identity());
        assert_eq!(
            engine.predict(&w).unwrap(),
            GbdtEngine::from_model(model).predict(&w).unwrap()
        );
    }

    #[test]
    fn test_xgboost_dump_from_string() {
        let engine = GbdtEngine::from_xgboost_json(XGB_DUMP).unwrap();
        let params = ScalerParams::new([100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], [10.0; 8]);

        let low = engine.predict(&window("80,98,70,18,7,1,37,250", &params)).unwrap();
        let high = engine.predict(&window("130,98,70,18,7,1,37,250", &params)).unwrap();
        assert!((low - 1.0 / (1.0 + 1.2f32.exp())).abs() < 1e-5, "got {low}");
        assert!((high - 1.0 / (1.0 + (-1.4f32).exp())).abs() < 1e-5, "got {high}");
    }

    #[test]
    fn test_xgboost_dump_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sepsis_model.xgb");
        std::fs::write(&path, XGB_DUMP).unwrap();

        let engine = load_engine(&path, ModelFormat::Xgboost).unwrap();
        assert!(engine.describe().contains("sepsis_model.xgb"));
        let p = engine
            .predict(&window("80,98,70,18,7,1,37,250", &ScalerParams::identity()))
            .unwrap();
        assert!((0.0..=1.0).contains(&p), "got {p}");

        let err = GbdtEngine::from_xgboost_json("0.0\n{not trees").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Inference);
    }

    #[test]
    fn test_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"\x00\x01 not a model").unwrap();
        let err = GbdtEngine::load(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Inference);

        let err = GbdtEngine::from_json("{}").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Inference);
    }
}
