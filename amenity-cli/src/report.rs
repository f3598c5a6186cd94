//! Report command implementation for the amenity CLI.

use std::io::Write;

use amenity_calibrator::{DEFAULT_SENSITIVITY, calibrate};
use amenity_core::{CityProfile, FacilityRecord};
use amenity_scorer::{AnalyticsReport, build_report};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CITY, ARG_FEEDBACK, ARG_INVENTORY, ARG_NORMS, ARG_SENSITIVITY, CliError, ENV_REPORT_CITY,
    ENV_REPORT_INVENTORY, load_feedback, load_norms, require_existing, require_optional,
    write_output,
};

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Summarise per-capita and per-area facility densities for a \
                 city next to the configured norms and, when a feedback log \
                 is given, the calibrated norms.",
    about = "Build an analytics report for a city"
)]
#[ortho_config(prefix = "AMENITY")]
pub(crate) struct ReportArgs {
    /// Path to a JSON array of facility records.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) inventory: Option<Utf8PathBuf>,
    /// Path to the JSON city profile.
    #[arg(long = ARG_CITY, value_name = "path")]
    #[serde(default)]
    pub(crate) city: Option<Utf8PathBuf>,
    /// Path to a JSON norm table; the built-in defaults are used otherwise.
    #[arg(long = ARG_NORMS, value_name = "path")]
    #[serde(default)]
    pub(crate) norms: Option<Utf8PathBuf>,
    /// Path to a JSON feedback log used to derive calibrated norms.
    #[arg(long = ARG_FEEDBACK, value_name = "path")]
    #[serde(default)]
    pub(crate) feedback: Option<Utf8PathBuf>,
    /// Norm change per unit of net rejection (default 0.01).
    #[arg(long = ARG_SENSITIVITY, value_name = "value")]
    #[serde(default)]
    pub(crate) sensitivity: Option<f64>,
}

impl ReportArgs {
    fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReportConfig::try_from(merged)
    }
}

/// Resolved `report` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportConfig {
    pub(crate) inventory: Utf8PathBuf,
    pub(crate) city: Utf8PathBuf,
    pub(crate) norms: Option<Utf8PathBuf>,
    pub(crate) feedback: Option<Utf8PathBuf>,
    pub(crate) sensitivity: f64,
}

impl ReportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.inventory, ARG_INVENTORY)?;
        require_existing(&self.city, ARG_CITY)?;
        require_optional(self.norms.as_ref(), ARG_NORMS)?;
        require_optional(self.feedback.as_ref(), ARG_FEEDBACK)?;
        Ok(())
    }
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = CliError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        let inventory = args.inventory.ok_or(CliError::MissingArgument {
            field: ARG_INVENTORY,
            env: ENV_REPORT_INVENTORY,
        })?;
        let city = args.city.ok_or(CliError::MissingArgument {
            field: ARG_CITY,
            env: ENV_REPORT_CITY,
        })?;
        Ok(Self {
            inventory,
            city,
            norms: args.norms,
            feedback: args.feedback,
            sensitivity: args.sensitivity.unwrap_or(DEFAULT_SENSITIVITY),
        })
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_report_with(&config, &mut stdout)
}

pub(crate) fn run_report_with(config: &ReportConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_report(config)?;
    write_output(writer, &report)
}

pub(crate) fn execute_report(config: &ReportConfig) -> Result<AnalyticsReport, CliError> {
    config.validate_sources()?;
    let inventory: Vec<FacilityRecord> = amenity_fs::read_json(&config.inventory)?;
    let profile: CityProfile = amenity_fs::read_json(&config.city)?;
    let configured = load_norms(config.norms.as_deref())?;
    let calibrated = match &config.feedback {
        Some(path) => {
            let snapshot = load_feedback(path, &configured)?;
            calibrate(&snapshot, &configured, config.sensitivity)?.table
        }
        None => configured.clone(),
    };
    Ok(build_report(&inventory, &profile, &configured, &calibrated)?)
}
