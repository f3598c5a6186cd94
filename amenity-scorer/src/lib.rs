//! Adequacy scoring for city facility inventories.
//!
//! The crate provides three complementary capabilities:
//! - **Per-category scoring** compares the facilities observed in an
//!   inventory with the number a [`NormTable`] demands for the city's
//!   population, yielding a [`ScoreResult`] with a deficit and a
//!   [`Verdict`].
//! - **Message rendering** turns a result into locale-specific text through
//!   [`MessageTemplates`]; scoring itself never produces prose.
//! - **Analytics reports** summarise per-capita and per-area densities next
//!   to the configured and calibrated norms.
//!
//! # Examples
//!
//! ```
//! use amenity_core::{Category, CityProfile, FacilityRecord, NormTable};
//! use amenity_scorer::{Verdict, score};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let city = CityProfile::new("Lviv, Ukraine", 100_000, 182.0)?;
//! let inventory = vec![FacilityRecord::new(Category::Hospital).with_name("City Hospital")];
//! let result = score(&inventory, &city, &NormTable::with_defaults(), Category::Hospital)?;
//! assert_eq!(result.required_count, 2);
//! assert_eq!(result.deficit, 1);
//! assert_eq!(result.verdict, Verdict::Inadequate);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use amenity_core::{Category, CityProfile, FacilityRecord, NORM_POPULATION_UNIT, NormTable};
use log::debug;

mod error;
pub mod message;
mod report;
mod types;

pub use error::ScoreError;
pub use message::{Locale, MessageTemplates, UnknownLocale};
pub use report::{AnalyticsReport, CategoryAnalytics, build_report};
pub use types::{Marker, ScoreResult, Verdict};

/// Relative slack, in machine epsilons, absorbed before rounding a
/// requirement up, so that products such as `10 * 0.7` do not demand an extra
/// facility through representation error. Being relative, it never rounds a
/// small positive requirement down to zero.
const REQUIREMENT_SLACK_ULPS: f64 = 4.0;

/// Score one category of a city's inventory against its norm.
///
/// Every record of the category counts towards `observed_count`, whether or
/// not it is named; only records with a representative point become
/// [`Marker`]s. A population of zero means no baseline, so nothing is
/// required.
///
/// # Errors
/// Returns [`ScoreError::InvalidProfile`] for negative or non-finite profile
/// values and [`ScoreError::UnknownCategory`] when `category` has no norm. No
/// partial result is produced in either case.
pub fn score(
    inventory: &[FacilityRecord],
    profile: &CityProfile,
    norms: &NormTable,
    category: Category,
) -> Result<ScoreResult, ScoreError> {
    profile.validate()?;
    score_validated(inventory, profile, norms, category)
}

/// Score every category configured in `norms`, in table order.
///
/// # Errors
/// Returns [`ScoreError::InvalidProfile`] when the profile is unusable.
pub fn score_all(
    inventory: &[FacilityRecord],
    profile: &CityProfile,
    norms: &NormTable,
) -> Result<Vec<ScoreResult>, ScoreError> {
    profile.validate()?;
    norms
        .categories()
        .map(|category| score_validated(inventory, profile, norms, category))
        .collect()
}

fn score_validated(
    inventory: &[FacilityRecord],
    profile: &CityProfile,
    norms: &NormTable,
    category: Category,
) -> Result<ScoreResult, ScoreError> {
    let norm = norms.get(category)?;
    let matching = || inventory.iter().filter(move |record| record.category == category);

    let observed_count = saturating_count(matching().count());
    let named_count = saturating_count(
        matching()
            .filter(|record| record.display_name().is_some())
            .count(),
    );
    let locations: Vec<Marker> = matching().filter_map(Marker::from_record).collect();
    let required_count = required_count(profile.population, norm.per_100k);
    let deficit = required_count.saturating_sub(observed_count);
    let verdict = Verdict::from_deficit(deficit);

    debug!(
        "{}: {category} observed={observed_count} required={required_count} verdict={verdict}",
        profile.identifier
    );

    Ok(ScoreResult {
        category,
        observed_count,
        named_count,
        required_count,
        deficit,
        verdict,
        locations,
    })
}

/// Facilities demanded by `per_100k` for `population` residents.
///
/// Returns `0` for an unknown (zero) or negative population.
///
/// # Examples
/// ```
/// use amenity_scorer::required_count;
///
/// assert_eq!(required_count(1_000_000, 7.0), 70);
/// assert_eq!(required_count(150_000, 1.0), 2);
/// assert_eq!(required_count(0, 7.0), 0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "requirements scale a real-valued norm and round up to whole facilities"
)]
pub fn required_count(population: i64, per_100k: f64) -> u64 {
    if population <= 0 || !per_100k.is_finite() || per_100k <= 0.0 {
        return 0;
    }
    let raw = population as f64 * per_100k / f64::from(NORM_POPULATION_UNIT);
    let rounded = (raw * (1.0 - REQUIREMENT_SLACK_ULPS * f64::EPSILON)).ceil();
    if rounded <= 0.0 {
        0
    } else {
        // Saturating float-to-int cast; a norm large enough to overflow is
        // already nonsensical.
        rounded as u64
    }
}

pub(crate) fn saturating_count(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}
