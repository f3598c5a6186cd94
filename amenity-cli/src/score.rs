//! Score command implementation for the amenity CLI.

use std::io::Write;

use amenity_core::{Category, CityProfile, FacilityRecord, NormTable};
use amenity_scorer::{Locale, MessageTemplates, ScoreResult};
use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATEGORY, ARG_CITY, ARG_INVENTORY, ARG_LOCALE, ARG_MESSAGES, ARG_NORMS, CliError,
    ENV_SCORE_CITY, ENV_SCORE_INVENTORY, load_norms, require_existing, require_optional,
    write_output,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compare a JSON facility inventory with the norms for a city \
                 profile. Prints one result per category together with the \
                 rendered verdict message.",
    about = "Score an inventory against facility norms"
)]
#[ortho_config(prefix = "AMENITY")]
pub(crate) struct ScoreArgs {
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
    /// Score only this category.
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Path to JSON message templates overriding the locale preset.
    #[arg(long = ARG_MESSAGES, value_name = "path")]
    #[serde(default)]
    pub(crate) messages: Option<Utf8PathBuf>,
    /// Built-in message locale (`en` or `ru`).
    #[arg(long = ARG_LOCALE, value_name = "code")]
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

impl ScoreArgs {
    fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    pub(crate) inventory: Utf8PathBuf,
    pub(crate) city: Utf8PathBuf,
    pub(crate) norms: Option<Utf8PathBuf>,
    pub(crate) category: Option<Category>,
    pub(crate) messages: Option<Utf8PathBuf>,
    pub(crate) locale: Locale,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.inventory, ARG_INVENTORY)?;
        require_existing(&self.city, ARG_CITY)?;
        require_optional(self.norms.as_ref(), ARG_NORMS)?;
        require_optional(self.messages.as_ref(), ARG_MESSAGES)?;
        Ok(())
    }

    fn templates(&self) -> Result<MessageTemplates, CliError> {
        match &self.messages {
            Some(path) => Ok(amenity_fs::read_json(path)?),
            None => Ok(MessageTemplates::for_locale(self.locale)),
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let inventory = args.inventory.ok_or(CliError::MissingArgument {
            field: ARG_INVENTORY,
            env: ENV_SCORE_INVENTORY,
        })?;
        let city = args.city.ok_or(CliError::MissingArgument {
            field: ARG_CITY,
            env: ENV_SCORE_CITY,
        })?;
        let category = args
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        let locale = args
            .locale
            .as_deref()
            .map(str::parse::<Locale>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            inventory,
            city,
            norms: args.norms,
            category,
            messages: args.messages,
            locale,
        })
    }
}

/// One scored category with its rendered message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScoredCategory {
    pub(crate) result: ScoreResult,
    pub(crate) message: String,
}

/// Output document of the `score` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScoreOutput {
    pub(crate) city: String,
    pub(crate) results: Vec<ScoredCategory>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_score_with(&config, &mut stdout)
}

pub(crate) fn run_score_with(config: &ScoreConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let output = execute_score(config)?;
    write_output(writer, &output)
}

pub(crate) fn execute_score(config: &ScoreConfig) -> Result<ScoreOutput, CliError> {
    config.validate_sources()?;
    let inventory: Vec<FacilityRecord> = amenity_fs::read_json(&config.inventory)?;
    let profile: CityProfile = amenity_fs::read_json(&config.city)?;
    let norms: NormTable = load_norms(config.norms.as_deref())?;
    let templates = config.templates()?;

    let results = match config.category {
        Some(category) => vec![amenity_scorer::score(&inventory, &profile, &norms, category)?],
        None => amenity_scorer::score_all(&inventory, &profile, &norms)?,
    };
    info!(
        "scored {} categories for {} from {} records",
        results.len(),
        profile.identifier,
        inventory.len()
    );

    Ok(ScoreOutput {
        results: results
            .into_iter()
            .map(|result| ScoredCategory {
                message: templates.render(&result),
                result,
            })
            .collect(),
        city: profile.identifier,
    })
}
