//! Focused unit tests covering the calibrate command.

use super::helpers::{Artefacts, decode};
use super::*;
use crate::calibrate::{CalibrateArgs, CalibrateConfig, execute_calibrate, run_calibrate_with};
use amenity_calibrator::CalibratorError;
use amenity_core::Category;
use rstest::rstest;
use serde_json::json;

const TOLERANCE: f64 = 1e-9;

fn config(feedback: Utf8PathBuf) -> CalibrateConfig {
    CalibrateConfig::try_from(CalibrateArgs {
        feedback: Some(feedback),
        ..CalibrateArgs::default()
    })
    .expect("config should build")
}

#[rstest]
fn converting_calibrate_without_feedback_errors() {
    let err = CalibrateConfig::try_from(CalibrateArgs::default()).expect_err("missing log");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_FEEDBACK);
            assert_eq!(env, ENV_CALIBRATE_FEEDBACK);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn sensitivity_defaults_to_one_hundredth() {
    let calibration = config(Utf8PathBuf::from("feedback.json"));
    assert_eq!(calibration.sensitivity, amenity_calibrator::DEFAULT_SENSITIVITY);
}

#[rstest]
fn net_rejections_raise_the_park_norm() {
    let artefacts = Artefacts::new();
    let result =
        execute_calibrate(&config(artefacts.feedback("park", 8, 2))).expect("calibration runs");

    let park = result.table.get(Category::Park).expect("park").per_100k;
    assert!((park - 5.56).abs() < TOLERANCE);
    assert!((result.delta(Category::Park) - 0.06).abs() < TOLERANCE);
    assert_eq!(result.delta(Category::School), 0.0);
}

#[rstest]
fn calibrated_table_is_written_when_requested() {
    let artefacts = Artefacts::new();
    let norms = artefacts.write("norms.json", &json!({"park": 5.5, "school": 7.0}));
    let output = artefacts.path("out/calibrated.json");
    let mut calibration = config(artefacts.feedback("park", 10, 0));
    calibration.norms = Some(norms);
    calibration.output = Some(output.clone());

    let mut buffer = Vec::new();
    run_calibrate_with(&calibration, &mut buffer).expect("calibration runs");

    let written: NormTable = amenity_fs::read_json(&output).expect("table written");
    let park = written.get(Category::Park).expect("park").per_100k;
    assert!((park - 5.6).abs() < TOLERANCE);
    assert_eq!(written.len(), 2);

    let printed = decode(&buffer);
    assert!(printed["deltas"]["park"].as_f64().is_some_and(|delta| delta > 0.0));
    assert_eq!(printed["table"]["school"], json!(7.0));
}

#[rstest]
fn negative_sensitivity_is_refused() {
    let artefacts = Artefacts::new();
    let mut calibration = config(artefacts.feedback("park", 1, 0));
    calibration.sensitivity = -0.5;
    let err = execute_calibrate(&calibration).expect_err("invalid sensitivity");
    assert!(matches!(
        err,
        CliError::Calibration(CalibratorError::InvalidSensitivity { .. })
    ));
}

#[rstest]
fn malformed_feedback_is_a_parse_error() {
    let artefacts = Artefacts::new();
    let feedback = artefacts.write("feedback.json", &json!([{"category": "park", "value": "meh"}]));
    let err = execute_calibrate(&config(feedback)).expect_err("unknown feedback value");
    assert!(matches!(
        err,
        CliError::Artefact(amenity_fs::ArtefactError::Parse { .. })
    ));
}
