//! Deterministic fixtures shared by unit, behaviour and property tests.
//!
//! Feedback fixtures are built from explicit counts; nothing here draws
//! random placeholder signals.

use geo::Coord;

use crate::{
    CalibrationError, CalibrationResult, Calibrator, Category, CityProfile, FacilityRecord,
    FeedbackSnapshot, NormTable,
};

/// Build `count` named facilities with distinct representative points.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "fixture coordinates are spread along a small grid"
)]
pub fn named_facilities(category: Category, count: u32) -> Vec<FacilityRecord> {
    (0..count)
        .map(|index| {
            FacilityRecord::new(category)
                .with_name(format!("{category} {index}"))
                .with_location(Coord {
                    x: 30.5 + f64::from(index) * 0.001,
                    y: 50.4,
                })
        })
        .collect()
}

/// Build `count` located facilities without a name.
#[must_use]
pub fn unnamed_facilities(category: Category, count: u32) -> Vec<FacilityRecord> {
    (0..count)
        .map(|_| FacilityRecord::new(category).with_location(Coord { x: 30.5, y: 50.4 }))
        .collect()
}

/// Build `count` named facilities whose geometry yielded no point.
#[must_use]
pub fn unlocated_facilities(category: Category, count: u32) -> Vec<FacilityRecord> {
    (0..count)
        .map(|index| FacilityRecord::new(category).with_name(format!("{category} site {index}")))
        .collect()
}

/// A valid city profile with the given population and a fixed area.
///
/// # Panics
/// Panics when `population` is negative.
#[must_use]
#[expect(clippy::expect_used, reason = "fixtures fail fast on misuse")]
pub fn city(population: i64) -> CityProfile {
    CityProfile::new("Testville, Testland", population, 100.0).expect("valid fixture city")
}

/// Calibrator that returns the current table unchanged.
#[derive(Debug, Copy, Clone, Default)]
pub struct FrozenCalibrator;

impl Calibrator for FrozenCalibrator {
    fn calibrate(
        &self,
        _feedback: &FeedbackSnapshot,
        current: &NormTable,
    ) -> Result<CalibrationResult, CalibrationError> {
        Ok(CalibrationResult {
            table: current.clone(),
            deltas: current.categories().map(|category| (category, 0.0)).collect(),
        })
    }
}
