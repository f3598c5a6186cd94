//! Error types emitted by the amenity CLI.

use std::sync::Arc;

use amenity_calibrator::CalibratorError;
use amenity_core::UnknownCategory;
use amenity_fs::ArtefactError;
use amenity_scorer::{ScoreError, UnknownLocale};
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the amenity CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Path that is not a regular file.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Path that could not be inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// An option named a category the engine does not know.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The requested message locale has no built-in templates.
    #[error(transparent)]
    UnknownLocale(#[from] UnknownLocale),
    /// Reading or writing a JSON artefact failed.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    /// Scoring or report generation failed.
    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
    /// Calibration failed.
    #[error("calibration failed: {0}")]
    Calibration(#[from] CalibratorError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
