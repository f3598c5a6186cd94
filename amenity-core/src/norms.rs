//! Per-category facility norms and the live, swappable norm table.
//!
//! A [`NormTable`] is immutable once built. Calibration never edits a table in
//! place; it builds a complete replacement which [`LiveNorms::replace`]
//! installs with a single atomic pointer swap, so a reader holding the result
//! of [`LiveNorms::load`] always sees one coherent set of norms.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use log::{info, warn};
use thiserror::Error;

use crate::{Category, UnknownCategory};

/// Minimum number of facilities of one category per 100,000 residents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormEntry {
    /// Category the norm applies to.
    pub category: Category,
    /// Required facilities per 100,000 residents; finite and `>= 0`.
    pub per_100k: f64,
}

impl NormEntry {
    /// Pair a category with its norm.
    #[must_use]
    pub const fn new(category: Category, per_100k: f64) -> Self {
        Self { category, per_100k }
    }
}

/// Errors raised while building or installing a [`NormTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormTableError {
    /// No categories were configured.
    #[error("norm table must configure at least one category")]
    Empty,
    /// The same category was configured twice.
    #[error("category {category} is configured more than once")]
    DuplicateCategory {
        /// Repeated category.
        category: Category,
    },
    /// A norm was negative or not finite.
    #[error("norm for {category} must be a finite non-negative number (got {per_100k})")]
    InvalidNorm {
        /// Category carrying the bad value.
        category: Category,
        /// Offending value.
        per_100k: f64,
    },
    /// A replacement table does not cover exactly the configured categories.
    #[error("replacement norms cover {found:?} but the configured set is {expected:?}")]
    CategorySetMismatch {
        /// Categories of the live table.
        expected: Vec<Category>,
        /// Categories of the rejected table.
        found: Vec<Category>,
    },
}

/// Complete mapping from every configured category to its norm.
///
/// # Examples
/// ```
/// use amenity_core::{Category, NormEntry, NormTable};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = NormTable::new([
///     NormEntry::new(Category::School, 7.0),
///     NormEntry::new(Category::Park, 5.5),
/// ])?;
/// assert_eq!(table.get(Category::School)?.per_100k, 7.0);
/// assert!(table.get(Category::Mall).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "BTreeMap<Category, f64>",
        into = "BTreeMap<Category, f64>"
    )
)]
pub struct NormTable {
    norms: BTreeMap<Category, f64>,
}

impl NormTable {
    /// Validates and constructs a [`NormTable`].
    ///
    /// # Errors
    /// Returns [`NormTableError`] when no entries are given, a category is
    /// repeated, or a norm is negative or not finite.
    pub fn new(entries: impl IntoIterator<Item = NormEntry>) -> Result<Self, NormTableError> {
        let mut norms = BTreeMap::new();
        for entry in entries {
            validate_norm(entry)?;
            if norms.insert(entry.category, entry.per_100k).is_some() {
                return Err(NormTableError::DuplicateCategory {
                    category: entry.category,
                });
            }
        }
        if norms.is_empty() {
            return Err(NormTableError::Empty);
        }
        Ok(Self { norms })
    }

    /// Hand-configured defaults covering every [`Category`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let norms = DEFAULT_NORMS.into_iter().collect();
        Self { norms }
    }

    /// Return the norm for `category`.
    ///
    /// # Errors
    /// Returns [`UnknownCategory`] when the category is not configured.
    pub fn get(&self, category: Category) -> Result<NormEntry, UnknownCategory> {
        self.norms
            .get(&category)
            .map(|&per_100k| NormEntry::new(category, per_100k))
            .ok_or_else(|| UnknownCategory::from(category))
    }

    /// Report whether `category` is configured.
    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.norms.contains_key(&category)
    }

    /// Iterate over the configured categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.norms.keys().copied()
    }

    /// Iterate over every entry in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = NormEntry> + '_ {
        self.norms
            .iter()
            .map(|(&category, &per_100k)| NormEntry::new(category, per_100k))
    }

    /// Number of configured categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.norms.len()
    }

    /// Always `false` for a validated table; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    /// Report whether both tables configure exactly the same categories.
    #[must_use]
    pub fn covers_same_categories(&self, other: &Self) -> bool {
        self.norms.keys().eq(other.norms.keys())
    }
}

impl Default for NormTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TryFrom<BTreeMap<Category, f64>> for NormTable {
    type Error = NormTableError;

    fn try_from(norms: BTreeMap<Category, f64>) -> Result<Self, Self::Error> {
        Self::new(
            norms
                .into_iter()
                .map(|(category, per_100k)| NormEntry::new(category, per_100k)),
        )
    }
}

impl From<NormTable> for BTreeMap<Category, f64> {
    fn from(table: NormTable) -> Self {
        table.norms
    }
}

const DEFAULT_NORMS: [(Category, f64); 8] = [
    (Category::School, 7.0),
    (Category::Hospital, 2.0),
    (Category::Park, 5.5),
    (Category::Restaurant, 40.0),
    (Category::Pharmacy, 20.0),
    (Category::Gym, 8.0),
    (Category::Library, 3.0),
    (Category::Mall, 1.5),
];

fn validate_norm(entry: NormEntry) -> Result<(), NormTableError> {
    if entry.per_100k.is_finite() && entry.per_100k >= 0.0 {
        Ok(())
    } else {
        Err(NormTableError::InvalidNorm {
            category: entry.category,
            per_100k: entry.per_100k,
        })
    }
}

/// Process-wide handle on the norm table currently in force.
///
/// Readers take a full snapshot with [`LiveNorms::load`]; writers install a
/// complete replacement with [`LiveNorms::replace`]. The category set fixed
/// at construction never changes.
#[derive(Debug)]
pub struct LiveNorms {
    current: ArcSwap<NormTable>,
}

impl LiveNorms {
    /// Start serving `table`.
    #[must_use]
    pub fn new(table: NormTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Return the table in force at the time of the call.
    #[must_use]
    pub fn load(&self) -> Arc<NormTable> {
        self.current.load_full()
    }

    /// Atomically install `table`, returning the table it replaced.
    ///
    /// # Errors
    /// Returns [`NormTableError::CategorySetMismatch`] when `table` does not
    /// configure exactly the categories of the live table; the live table is
    /// left untouched.
    pub fn replace(&self, table: NormTable) -> Result<Arc<NormTable>, NormTableError> {
        let live = self.current.load();
        if !live.covers_same_categories(&table) {
            let expected: Vec<Category> = live.categories().collect();
            let found: Vec<Category> = table.categories().collect();
            warn!("rejecting norm table covering {found:?}; live table covers {expected:?}");
            return Err(NormTableError::CategorySetMismatch { expected, found });
        }
        let previous = self.current.swap(Arc::new(table));
        info!("installed replacement norm table ({} categories)", previous.len());
        Ok(previous)
    }
}

impl Default for LiveNorms {
    fn default() -> Self {
        Self::new(NormTable::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn school_and_park() -> NormTable {
        NormTable::new([
            NormEntry::new(Category::School, 7.0),
            NormEntry::new(Category::Park, 5.5),
        ])
        .expect("valid table")
    }

    #[rstest]
    fn defaults_cover_every_category() {
        let table = NormTable::with_defaults();
        for category in Category::ALL {
            assert!(table.contains(category), "{category} missing");
        }
    }

    #[rstest]
    fn get_rejects_unconfigured_category(school_and_park: NormTable) {
        let err = school_and_park.get(Category::Gym).expect_err("gym is not configured");
        assert_eq!(err.name, "gym");
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn new_rejects_unusable_norms(#[case] value: f64) {
        let err = NormTable::new([NormEntry::new(Category::School, value)])
            .expect_err("invalid norm");
        assert!(matches!(err, NormTableError::InvalidNorm { .. }));
    }

    #[rstest]
    fn new_rejects_duplicates() {
        let err = NormTable::new([
            NormEntry::new(Category::School, 1.0),
            NormEntry::new(Category::School, 2.0),
        ])
        .expect_err("duplicate category");
        assert_eq!(
            err,
            NormTableError::DuplicateCategory {
                category: Category::School
            }
        );
    }

    #[rstest]
    fn new_rejects_empty() {
        let err = NormTable::new([]).expect_err("empty table");
        assert_eq!(err, NormTableError::Empty);
    }

    #[rstest]
    fn replace_swaps_whole_table(school_and_park: NormTable) {
        let live = LiveNorms::new(school_and_park);
        let next = NormTable::new([
            NormEntry::new(Category::School, 8.0),
            NormEntry::new(Category::Park, 6.0),
        ])
        .expect("valid table");

        let previous = live.replace(next.clone()).expect("same categories");

        assert_eq!(previous.get(Category::School).map(|e| e.per_100k), Ok(7.0));
        assert_eq!(*live.load(), next);
    }

    #[rstest]
    fn replace_rejects_dropped_categories(school_and_park: NormTable) {
        let live = LiveNorms::new(school_and_park.clone());
        let partial =
            NormTable::new([NormEntry::new(Category::School, 9.0)]).expect("valid table");

        let err = live.replace(partial).expect_err("park was dropped");

        assert!(matches!(err, NormTableError::CategorySetMismatch { .. }));
        assert_eq!(*live.load(), school_and_park);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn json_round_trip_validates(school_and_park: NormTable) {
        let json = serde_json::to_string(&school_and_park).expect("serialise");
        assert_eq!(json, r#"{"school":7.0,"park":5.5}"#);
        let bad: Result<NormTable, _> = serde_json::from_str(r#"{"school":-1.0}"#);
        assert!(bad.is_err());
    }
}
