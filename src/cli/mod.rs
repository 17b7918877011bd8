//! CLI command definitions and handlers

mod check;
mod init;
mod predict;
mod render;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sepsafe::{AppConfig, ModelFormat, Pipeline, Vital};
use std::path::PathBuf;

fn parse_model_format(s: &str) -> Result<ModelFormat, String> {
    ModelFormat::parse(s).ok_or_else(|| format!("'{}' is not a model format (gbdt, xgboost)", s))
}

/// Sepsafe - early prediction of sepsis
#[derive(Parser, Debug)]
#[command(name = "sepsafe")]
#[command(
    version,
    about = "Early sepsis-risk prediction from eight vital signs",
    long_about = "Sepsafe standardizes eight manually entered vital signs, feeds them to a \
pre-trained classifier and reports the sepsis probability, a LOW / MODERATE / HIGH band \
and what to do about it.\n\n\
Values are entered in this order, separated by commas:\n  \
HR,O2Sat,MAP,Resp,WBC,Lactate,Temp,Platelets\n\n\
Run without a subcommand to start an interactive session.",
    after_help = "\
Examples:
  sepsafe                                     Interactive session (one line per prediction)
  sepsafe predict 80,98,70,18,7,1,37,250      Single prediction
  sepsafe predict 80,98,70,18,7,1,37,250 -f json
  sepsafe check                               Verify config, scaler and model
  sepsafe init                                Write an example sepsafe.toml"
)]
pub struct Cli {
    /// Config file (default: ./sepsafe.toml, then ~/.config/sepsafe/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scaler params JSON (overrides config)
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Model artifact (overrides config)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Model artifact format: gbdt, xgboost (overrides config)
    #[arg(long, global = true, value_parser = parse_model_format)]
    pub model_format: Option<ModelFormat>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict sepsis risk for one set of vitals
    Predict {
        /// Eight comma-separated values: HR,O2Sat,MAP,Resp,WBC,Lactate,Temp,Platelets
        #[arg(allow_hyphen_values = true)]
        values: String,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Interactive session: one prediction per input line, with trend chart
    Session,

    /// Check configuration, scaler params and model
    Check,

    /// Write an example sepsafe.toml
    Init {
        /// Where to write it
        #[arg(default_value = sepsafe::config::CONFIG_FILE_NAME)]
        path: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init { ref path }) => init::run(path),
        Some(Commands::Check) => check::run(&load_config(&cli)?),
        Some(Commands::Predict {
            ref values,
            ref format,
        }) => {
            let pipeline = build_pipeline(&load_config(&cli)?)?;
            predict::run(&pipeline, values, format)
        }
        Some(Commands::Session) | None => {
            let pipeline = build_pipeline(&load_config(&cli)?)?;
            session::run(pipeline)
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    Ok(AppConfig::load(cli.config.as_deref())?.with_overrides(
        cli.scaler.clone(),
        cli.model.clone(),
        cli.model_format,
    ))
}

fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    Pipeline::from_config(config)
        .with_context(|| format!("Failed to load model {}", config.assets.model.display()))
}

/// "HR,O2Sat,MAP,..." hint shown with input prompts
pub(crate) fn order_hint() -> String {
    format!("Variables in order: {}", Vital::order_hint())
}
