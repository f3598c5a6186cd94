//! Focused unit tests covering the report command.

use super::helpers::{Artefacts, decode};
use super::*;
use crate::report::{ReportArgs, ReportConfig, execute_report, run_report_with};
use amenity_core::Category;
use rstest::rstest;
use serde_json::{Value, json};

const TOLERANCE: f64 = 1e-9;

fn config(artefacts: &Artefacts, population: i64) -> ReportConfig {
    ReportConfig::try_from(ReportArgs {
        inventory: Some(artefacts.schools(3, 4)),
        city: Some(artefacts.city(population)),
        ..ReportArgs::default()
    })
    .expect("config should build")
}

#[rstest]
fn converting_report_without_city_errors() {
    let args = ReportArgs {
        inventory: Some(Utf8PathBuf::from("inventory.json")),
        ..ReportArgs::default()
    };
    let err = ReportConfig::try_from(args).expect_err("missing city");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CITY);
            assert_eq!(env, ENV_REPORT_CITY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn report_without_feedback_mirrors_configured_norms() {
    let artefacts = Artefacts::new();
    let report = execute_report(&config(&artefacts, 700_000)).expect("report runs");

    let school = report
        .categories
        .iter()
        .find(|row| row.category == Category::School)
        .expect("school row");
    assert_eq!(school.count, 7);
    assert_eq!(school.per_capita, Some(1.0));
    assert_eq!(school.per_km2, Some(0.01));
    assert_eq!(school.configured_norm, school.calibrated_norm);
}

#[rstest]
fn feedback_moves_only_the_calibrated_norm() {
    let artefacts = Artefacts::new();
    let mut reporting = config(&artefacts, 700_000);
    reporting.feedback = Some(artefacts.feedback("school", 20, 0));

    let report = execute_report(&reporting).expect("report runs");

    let school = report
        .categories
        .iter()
        .find(|row| row.category == Category::School)
        .expect("school row");
    assert_eq!(school.configured_norm, 7.0);
    assert!((school.calibrated_norm - 7.2).abs() < TOLERANCE);
}

#[rstest]
fn unknown_population_leaves_per_capita_empty() {
    let artefacts = Artefacts::new();
    let mut buffer = Vec::new();
    run_report_with(&config(&artefacts, 0), &mut buffer).expect("report runs");

    let output = decode(&buffer);
    let rows = output["categories"].as_array().expect("category rows");
    assert!(rows.iter().all(|row| row["per_capita"] == Value::Null));
    assert_eq!(output["population"], json!(0));
}
