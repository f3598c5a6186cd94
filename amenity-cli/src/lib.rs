//! Command-line interface for scoring and calibrating amenity norms.
//!
//! Every subcommand reads JSON artefacts named by the caller and prints a
//! JSON document on stdout. Options are layered from CLI flags, `AMENITY_*`
//! environment variables and configuration files through `ortho_config`.
#![forbid(unsafe_code)]

use std::io::Write;

use amenity_core::{FeedbackSignal, FeedbackSnapshot, FeedbackStore, NormTable};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

mod calibrate;
mod error;
mod report;
mod score;

pub use error::CliError;

use calibrate::{CalibrateArgs, run_calibrate};
use report::{ReportArgs, run_report};
use score::{ScoreArgs, run_score};

pub(crate) const ARG_INVENTORY: &str = "inventory";
pub(crate) const ARG_CITY: &str = "city";
pub(crate) const ARG_NORMS: &str = "norms";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_MESSAGES: &str = "messages";
pub(crate) const ARG_LOCALE: &str = "locale";
pub(crate) const ARG_FEEDBACK: &str = "feedback";
pub(crate) const ARG_SENSITIVITY: &str = "sensitivity";
pub(crate) const ARG_OUTPUT: &str = "output";

pub(crate) const ENV_SCORE_INVENTORY: &str = "AMENITY_CMDS_SCORE_INVENTORY";
pub(crate) const ENV_SCORE_CITY: &str = "AMENITY_CMDS_SCORE_CITY";
pub(crate) const ENV_CALIBRATE_FEEDBACK: &str = "AMENITY_CMDS_CALIBRATE_FEEDBACK";
pub(crate) const ENV_REPORT_INVENTORY: &str = "AMENITY_CMDS_REPORT_INVENTORY";
pub(crate) const ENV_REPORT_CITY: &str = "AMENITY_CMDS_REPORT_CITY";

/// Run the amenity CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or artefacts are
/// unusable, or when scoring or calibration fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Calibrate(args) => run_calibrate(args),
        Command::Report(args) => run_report(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "amenity",
    about = "Score city facility inventories against population norms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare an inventory with the norms and render verdicts.
    Score(ScoreArgs),
    /// Adjust norms from a feedback log.
    Calibrate(CalibrateArgs),
    /// Summarise densities alongside configured and calibrated norms.
    Report(ReportArgs),
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match amenity_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn require_optional(
    path: Option<&Utf8PathBuf>,
    field: &'static str,
) -> Result<(), CliError> {
    path.map_or(Ok(()), |existing| require_existing(existing, field))
}

/// Load the norm table at `path`, or the built-in defaults.
pub(crate) fn load_norms(path: Option<&Utf8Path>) -> Result<NormTable, CliError> {
    match path {
        Some(source) => Ok(amenity_fs::read_json(source)?),
        None => {
            debug!("no norm table supplied; using built-in defaults");
            Ok(NormTable::with_defaults())
        }
    }
}

/// Replay a feedback log into a store for `norms` and freeze its tallies.
pub(crate) fn load_feedback(
    path: &Utf8Path,
    norms: &NormTable,
) -> Result<FeedbackSnapshot, CliError> {
    let signals: Vec<FeedbackSignal> = amenity_fs::read_json(path)?;
    let store = FeedbackStore::for_table(norms);
    for signal in signals {
        store.record_signal(signal)?;
    }
    debug!("replayed {} feedback signals from {path}", store.len());
    Ok(store.snapshot())
}

pub(crate) fn write_output<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
