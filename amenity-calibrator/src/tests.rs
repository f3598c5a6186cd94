//! Unit coverage for the proportional calibrator.

use amenity_core::{Category, FeedbackSnapshot, FeedbackTally, NormEntry, NormTable};
use rstest::{fixture, rstest};

use super::*;

const TOLERANCE: f64 = 1e-9;

#[fixture]
fn parks_and_schools() -> NormTable {
    NormTable::new([
        NormEntry::new(Category::Park, 5.5),
        NormEntry::new(Category::School, 7.0),
    ])
    .expect("valid table")
}

fn snapshot(category: Category, accept: u64, reject: u64) -> FeedbackSnapshot {
    FeedbackSnapshot::from_tallies([(category, FeedbackTally::new(accept, reject))])
}

fn norm(table: &NormTable, category: Category) -> f64 {
    table.get(category).expect("configured category").per_100k
}

#[rstest]
fn rejections_raise_the_norm(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Park, 2, 8), &parks_and_schools, 0.01)
        .expect("calibrates");
    assert!((norm(&result.table, Category::Park) - 5.56).abs() < TOLERANCE);
    assert!((result.delta(Category::Park) - 0.06).abs() < TOLERANCE);
}

#[rstest]
fn acceptances_lower_the_norm(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::School, 30, 10), &parks_and_schools, 0.05)
        .expect("calibrates");
    assert!((norm(&result.table, Category::School) - 6.0).abs() < TOLERANCE);
}

#[rstest]
fn norms_are_clamped_at_zero(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Park, 1_000, 0), &parks_and_schools, 0.01)
        .expect("calibrates");
    assert_eq!(norm(&result.table, Category::Park), 0.0);
    assert!((result.delta(Category::Park) + 5.5).abs() < TOLERANCE);
}

#[rstest]
fn categories_without_feedback_are_carried_over(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Park, 0, 3), &parks_and_schools, 0.01)
        .expect("calibrates");
    assert_eq!(norm(&result.table, Category::School), 7.0);
    assert_eq!(result.delta(Category::School), 0.0);
    assert!(result.deltas.contains_key(&Category::School));
}

#[rstest]
fn feedback_for_unconfigured_categories_is_ignored(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Mall, 0, 50), &parks_and_schools, 0.01)
        .expect("calibrates");
    assert_eq!(result.table, parks_and_schools);
    assert!(!result.deltas.contains_key(&Category::Mall));
}

#[rstest]
fn empty_snapshot_leaves_the_table_unchanged(parks_and_schools: NormTable) {
    let result = ProportionalCalibrator::default()
        .calibrate(&FeedbackSnapshot::default(), &parks_and_schools)
        .expect("calibrates");
    assert_eq!(result.table, parks_and_schools);
    assert!(result.deltas.values().all(|delta| *delta == 0.0));
}

#[rstest]
fn balanced_feedback_changes_nothing(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Park, 4, 4), &parks_and_schools, 0.5)
        .expect("calibrates");
    assert_eq!(norm(&result.table, Category::Park), 5.5);
}

#[rstest]
#[case(-0.01)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rejects_unusable_sensitivity(#[case] sensitivity: f64) {
    let err = ProportionalCalibrator::new(sensitivity).expect_err("invalid sensitivity");
    assert!(matches!(err, CalibratorError::InvalidSensitivity { .. }));
}

#[rstest]
fn zero_sensitivity_freezes_norms(parks_and_schools: NormTable) {
    let result = calibrate(&snapshot(Category::Park, 0, 100), &parks_and_schools, 0.0)
        .expect("calibrates");
    assert_eq!(result.table, parks_and_schools);
}

#[rstest]
fn default_sensitivity_is_one_hundredth() {
    assert_eq!(
        ProportionalCalibrator::default().sensitivity(),
        DEFAULT_SENSITIVITY
    );
}
