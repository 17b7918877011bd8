//! Predict command - one request, printed as text or JSON

use anyhow::Result;
use sepsafe::{Assessment, Pipeline};
use serde::Serialize;

use super::render;

#[derive(Serialize)]
struct PredictionJson<'a> {
    #[serde(flatten)]
    assessment: &'a Assessment,
    advisory: &'a str,
}

pub fn run(pipeline: &Pipeline, values: &str, format: &str) -> Result<()> {
    let assessment = pipeline.run(values)?;

    match format {
        "json" => {
            let out = PredictionJson {
                assessment: &assessment,
                advisory: assessment.advisory(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => println!("{}", render::assessment(&assessment)),
    }
    Ok(())
}
