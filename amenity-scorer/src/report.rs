//! Aggregate analytics for a dashboard view of one city.
#![forbid(unsafe_code)]

use amenity_core::{CityProfile, FacilityRecord, NORM_POPULATION_UNIT, NormTable};
use serde::{Deserialize, Serialize};

use crate::{ScoreError, saturating_count};

/// Density figures and norms for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalytics {
    /// Category summarised by this row.
    pub category: amenity_core::Category,
    /// Facilities of the category in the inventory.
    pub count: u64,
    /// Facilities per 100,000 residents, rounded to two decimals; absent
    /// when the population is unknown.
    pub per_capita: Option<f64>,
    /// Facilities per square kilometre, rounded to two decimals; absent when
    /// the area is unknown.
    pub per_km2: Option<f64>,
    /// Norm from the hand-configured baseline.
    pub configured_norm: f64,
    /// Norm currently in force after calibration.
    pub calibrated_norm: f64,
}

/// Per-category analytics plus the city baseline they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// City identifier.
    pub city: String,
    /// Resident count; `0` when unknown.
    pub population: i64,
    /// Area in square kilometres; `0.0` when unknown.
    pub area_km2: f64,
    /// One row per configured category, in table order.
    pub categories: Vec<CategoryAnalytics>,
}

/// Build the analytics report for a city.
///
/// Rows follow the categories of `configured`; `calibrated` must cover the
/// same categories.
///
/// # Errors
/// Returns [`ScoreError::InvalidProfile`] for an unusable profile and
/// [`ScoreError::UnknownCategory`] when `calibrated` lacks a configured
/// category.
pub fn build_report(
    inventory: &[FacilityRecord],
    profile: &CityProfile,
    configured: &NormTable,
    calibrated: &NormTable,
) -> Result<AnalyticsReport, ScoreError> {
    profile.validate()?;
    let categories = configured
        .iter()
        .map(|entry| {
            let count = saturating_count(
                inventory
                    .iter()
                    .filter(|record| record.category == entry.category)
                    .count(),
            );
            Ok(CategoryAnalytics {
                category: entry.category,
                count,
                per_capita: per_capita(count, profile.population),
                per_km2: per_km2(count, profile.area_km2),
                configured_norm: entry.per_100k,
                calibrated_norm: calibrated.get(entry.category)?.per_100k,
            })
        })
        .collect::<Result<Vec<_>, ScoreError>>()?;

    Ok(AnalyticsReport {
        city: profile.identifier.clone(),
        population: profile.population,
        area_km2: profile.area_km2,
        categories,
    })
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "densities are reported as rounded real numbers"
)]
fn per_capita(count: u64, population: i64) -> Option<f64> {
    if population <= 0 {
        return None;
    }
    Some(round2(
        count as f64 / population as f64 * f64::from(NORM_POPULATION_UNIT),
    ))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "densities are reported as rounded real numbers"
)]
fn per_km2(count: u64, area_km2: f64) -> Option<f64> {
    if area_km2 <= 0.0 {
        return None;
    }
    Some(round2(count as f64 / area_km2))
}

#[expect(
    clippy::float_arithmetic,
    reason = "rounding to two decimals scales by one hundred"
)]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use amenity_core::Category;
    use amenity_core::test_support::{city, named_facilities, unnamed_facilities};
    use rstest::rstest;

    #[rstest]
    #[case(7, 1_000_000, Some(0.7))]
    #[case(1, 3, Some(33_333.33))]
    #[case(5, 0, None)]
    fn per_capita_rounds_to_two_decimals(
        #[case] count: u64,
        #[case] population: i64,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(per_capita(count, population), expected);
    }

    #[rstest]
    fn report_counts_unnamed_facilities() {
        let mut inventory = named_facilities(Category::Park, 3);
        inventory.extend(unnamed_facilities(Category::Park, 2));
        let norms = NormTable::with_defaults();

        let report = build_report(&inventory, &city(50_000), &norms, &norms)
            .expect("report builds");

        let park = report
            .categories
            .iter()
            .find(|row| row.category == Category::Park)
            .expect("park row");
        assert_eq!(park.count, 5);
        assert_eq!(park.per_capita, Some(10.0));
        assert_eq!(park.per_km2, Some(0.05));
        assert_eq!(report.categories.len(), Category::ALL.len());
    }
}
