//! Check command - verify config, scaler params and model

use anyhow::Result;
use console::style;
use sepsafe::engine::load_engine;
use sepsafe::{AppConfig, Pipeline, ScalerParams, ScalerStore, Vital, VitalReading};

pub fn run(config: &AppConfig) -> Result<()> {
    println!("{}\n", style("Sepsafe check").bold());
    let mut ok = true;

    match &config.source {
        Some(path) => pass(&format!("Config: {}", path.display())),
        None => println!("○ Config: none found, using defaults"),
    }

    let scaler = match ScalerParams::load(&config.assets.scaler_params) {
        Ok(params) => match params.degenerate_feature() {
            None => {
                pass(&format!(
                    "Scaler params: {}",
                    config.assets.scaler_params.display()
                ));
                Some(params)
            }
            Some(vital) => {
                fail(&format!("Scaler params: scale for {} is zero", vital));
                ok = false;
                None
            }
        },
        Err(e) => {
            fail(&format!("Scaler params: {}", e));
            ok = false;
            None
        }
    };

    let engine = match load_engine(&config.assets.model, config.assets.model_format) {
        Ok(engine) => {
            pass(&format!("Model: {}", engine.describe()));
            Some(engine)
        }
        Err(e) => {
            fail(&format!("Model: {}", e));
            ok = false;
            None
        }
    };

    // Smoke test on the middle of every valid band
    if let (Some(params), Some(engine)) = (scaler, engine) {
        let midpoints = Vital::ALL.map(|v| {
            let (min, max) = v.range();
            (min + max) / 2.0
        });
        let pipeline = Pipeline::new(ScalerStore::preloaded(params), engine);
        let result = VitalReading::from_values(midpoints)
            .and_then(|reading| pipeline.run_reading(&reading));
        match result {
            Ok(a) => pass(&format!(
                "Inference: [1,12,8] window -> {:.2} ({})",
                a.probability, a.band
            )),
            Err(e) => {
                fail(&format!("Inference: {}", e));
                ok = false;
            }
        }
    }

    if ok {
        println!("\n{}", style("All checks passed").green());
        Ok(())
    } else {
        anyhow::bail!("some checks failed")
    }
}

fn pass(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

fn fail(msg: &str) {
    println!("{} {}", style("✗").red(), msg);
}
