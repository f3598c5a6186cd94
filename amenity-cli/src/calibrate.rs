//! Calibrate command implementation for the amenity CLI.

use std::io::Write;

use amenity_calibrator::{DEFAULT_SENSITIVITY, calibrate};
use amenity_core::CalibrationResult;
use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_FEEDBACK, ARG_NORMS, ARG_OUTPUT, ARG_SENSITIVITY, CliError, ENV_CALIBRATE_FEEDBACK,
    load_feedback, load_norms, require_existing, require_optional, write_output,
};

/// CLI arguments for the `calibrate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replay a JSON feedback log against a norm table and print \
                 the adjusted table with the change applied to each \
                 category. Net rejections raise a norm; net acceptances \
                 lower it, never below zero.",
    about = "Adjust norms from user feedback"
)]
#[ortho_config(prefix = "AMENITY")]
pub(crate) struct CalibrateArgs {
    /// Path to a JSON array of feedback signals.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) feedback: Option<Utf8PathBuf>,
    /// Path to the JSON norm table to adjust; the built-in defaults are used
    /// otherwise.
    #[arg(long = ARG_NORMS, value_name = "path")]
    #[serde(default)]
    pub(crate) norms: Option<Utf8PathBuf>,
    /// Norm change per unit of net rejection (default 0.01).
    #[arg(long = ARG_SENSITIVITY, value_name = "value")]
    #[serde(default)]
    pub(crate) sensitivity: Option<f64>,
    /// Write the adjusted norm table to this path.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl CalibrateArgs {
    fn into_config(self) -> Result<CalibrateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CalibrateConfig::try_from(merged)
    }
}

/// Resolved `calibrate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CalibrateConfig {
    pub(crate) feedback: Utf8PathBuf,
    pub(crate) norms: Option<Utf8PathBuf>,
    pub(crate) sensitivity: f64,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl CalibrateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.feedback, ARG_FEEDBACK)?;
        require_optional(self.norms.as_ref(), ARG_NORMS)?;
        Ok(())
    }
}

impl TryFrom<CalibrateArgs> for CalibrateConfig {
    type Error = CliError;

    fn try_from(args: CalibrateArgs) -> Result<Self, Self::Error> {
        let feedback = args.feedback.ok_or(CliError::MissingArgument {
            field: ARG_FEEDBACK,
            env: ENV_CALIBRATE_FEEDBACK,
        })?;
        Ok(Self {
            feedback,
            norms: args.norms,
            sensitivity: args.sensitivity.unwrap_or(DEFAULT_SENSITIVITY),
            output: args.output,
        })
    }
}

pub(crate) fn run_calibrate(args: CalibrateArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_calibrate_with(&config, &mut stdout)
}

pub(crate) fn run_calibrate_with(
    config: &CalibrateConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let result = execute_calibrate(config)?;
    if let Some(path) = &config.output {
        amenity_fs::write_json(path, &result.table)?;
        info!("wrote calibrated norms to {path}");
    }
    write_output(writer, &result)
}

pub(crate) fn execute_calibrate(config: &CalibrateConfig) -> Result<CalibrationResult, CliError> {
    config.validate_sources()?;
    let norms = load_norms(config.norms.as_deref())?;
    let snapshot = load_feedback(&config.feedback, &norms)?;
    Ok(calibrate(&snapshot, &norms, config.sensitivity)?)
}
