//! Binary user feedback on category adequacy.
//!
//! The [`FeedbackStore`] is append-only for the lifetime of the process.
//! Calibration never reads it directly; it works from a
//! [`FeedbackSnapshot`] taken under a single lock acquisition.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use thiserror::Error;

use crate::{Category, NormTable, UnknownCategory};

/// A single accept/reject judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FeedbackValue {
    /// The current verdict looks right to the user.
    #[cfg_attr(feature = "serde", serde(alias = "confirm"))]
    Accept,
    /// The user disagrees and wants more facilities demanded.
    #[cfg_attr(feature = "serde", serde(alias = "decline"))]
    Reject,
}

impl FeedbackValue {
    /// Return the value as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for FeedbackValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when feedback text is neither an acceptance nor a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised feedback value '{raw}' (expected accept or reject)")]
pub struct UnknownFeedbackValue {
    /// Text supplied by the caller.
    pub raw: String,
}

impl std::str::FromStr for FeedbackValue {
    type Err = UnknownFeedbackValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "confirm" => Ok(Self::Accept),
            "reject" | "decline" => Ok(Self::Reject),
            _ => Err(UnknownFeedbackValue { raw: s.to_owned() }),
        }
    }
}

/// Feedback about one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedbackSignal {
    /// Category the judgement refers to.
    pub category: Category,
    /// The judgement itself.
    pub value: FeedbackValue,
}

impl FeedbackSignal {
    /// Pair a category with a judgement.
    #[must_use]
    pub const fn new(category: Category, value: FeedbackValue) -> Self {
        Self { category, value }
    }
}

/// Point-in-time acceptance and rejection counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedbackTally {
    /// Number of [`FeedbackValue::Accept`] signals.
    pub accept: u64,
    /// Number of [`FeedbackValue::Reject`] signals.
    pub reject: u64,
}

impl FeedbackTally {
    /// Build a tally from raw counts.
    #[must_use]
    pub const fn new(accept: u64, reject: u64) -> Self {
        Self { accept, reject }
    }

    /// Rejections minus acceptances.
    #[must_use]
    pub fn balance(self) -> i128 {
        i128::from(self.reject) - i128::from(self.accept)
    }

    /// Total number of signals.
    #[must_use]
    pub const fn total(self) -> u64 {
        self.accept.saturating_add(self.reject)
    }

    /// Whether no signal has been counted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.accept == 0 && self.reject == 0
    }

    const fn count(&mut self, value: FeedbackValue) {
        match value {
            FeedbackValue::Accept => self.accept = self.accept.saturating_add(1),
            FeedbackValue::Reject => self.reject = self.reject.saturating_add(1),
        }
    }

    const fn saturating_sub(self, earlier: Self) -> Self {
        Self {
            accept: self.accept.saturating_sub(earlier.accept),
            reject: self.reject.saturating_sub(earlier.reject),
        }
    }
}

/// Frozen tallies for every category that has received feedback.
///
/// Categories without signals are absent rather than present with zero
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FeedbackSnapshot {
    tallies: BTreeMap<Category, FeedbackTally>,
}

impl FeedbackSnapshot {
    /// Build a snapshot from explicit tallies, dropping empty ones.
    #[must_use]
    pub fn from_tallies(tallies: impl IntoIterator<Item = (Category, FeedbackTally)>) -> Self {
        Self {
            tallies: tallies
                .into_iter()
                .filter(|(_, tally)| !tally.is_empty())
                .collect(),
        }
    }

    /// Tally a sequence of signals.
    ///
    /// # Examples
    /// ```
    /// use amenity_core::{Category, FeedbackSignal, FeedbackSnapshot, FeedbackValue};
    ///
    /// let snapshot = FeedbackSnapshot::from_signals([
    ///     FeedbackSignal::new(Category::Park, FeedbackValue::Reject),
    ///     FeedbackSignal::new(Category::Park, FeedbackValue::Accept),
    ///     FeedbackSignal::new(Category::Park, FeedbackValue::Reject),
    /// ]);
    /// assert_eq!(snapshot.tally(Category::Park).balance(), 1);
    /// ```
    #[must_use]
    pub fn from_signals(signals: impl IntoIterator<Item = FeedbackSignal>) -> Self {
        let mut tallies: BTreeMap<Category, FeedbackTally> = BTreeMap::new();
        for signal in signals {
            tallies.entry(signal.category).or_default().count(signal.value);
        }
        Self { tallies }
    }

    /// Counts for `category`, zero when it has no feedback.
    #[must_use]
    pub fn tally(&self, category: Category) -> FeedbackTally {
        self.tallies.get(&category).copied().unwrap_or_default()
    }

    /// Iterate over categories with feedback in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, FeedbackTally)> + '_ {
        self.tallies
            .iter()
            .map(|(&category, &tally)| (category, tally))
    }

    /// Whether no category has feedback.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Signals recorded after `earlier` was taken.
    ///
    /// Counts only ever grow, so subtracting an older snapshot of the same
    /// store yields exactly the signals the older snapshot had not seen.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> Self {
        Self::from_tallies(
            self.iter()
                .map(|(category, tally)| (category, tally.saturating_sub(earlier.tally(category)))),
        )
    }
}

/// Thread-safe, append-only store of feedback signals.
///
/// A single mutex guards the whole store; appends are short and contention
/// across categories is expected to be low.
///
/// # Examples
/// ```
/// use amenity_core::{Category, FeedbackStore, FeedbackValue};
///
/// # fn main() -> Result<(), amenity_core::UnknownCategory> {
/// let store = FeedbackStore::new([Category::Park]);
/// store.record(Category::Park, FeedbackValue::Reject)?;
/// assert_eq!(store.snapshot_counts(Category::Park)?.reject, 1);
/// assert!(store.record(Category::Mall, FeedbackValue::Accept).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FeedbackStore {
    categories: BTreeSet<Category>,
    signals: Mutex<BTreeMap<Category, Vec<FeedbackValue>>>,
}

impl FeedbackStore {
    /// Create an empty store accepting feedback for `categories`.
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            signals: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create an empty store accepting feedback for the table's categories.
    #[must_use]
    pub fn for_table(table: &NormTable) -> Self {
        Self::new(table.categories())
    }

    /// Append one signal.
    ///
    /// # Errors
    /// Returns [`UnknownCategory`] when `category` is not configured.
    pub fn record(&self, category: Category, value: FeedbackValue) -> Result<(), UnknownCategory> {
        self.ensure_known(category)?;
        self.lock().entry(category).or_default().push(value);
        debug!("recorded {value} feedback for {category}");
        Ok(())
    }

    /// Append a [`FeedbackSignal`].
    ///
    /// # Errors
    /// Returns [`UnknownCategory`] when the signal's category is not
    /// configured.
    pub fn record_signal(&self, signal: FeedbackSignal) -> Result<(), UnknownCategory> {
        self.record(signal.category, signal.value)
    }

    /// Point-in-time counts for one category.
    ///
    /// # Errors
    /// Returns [`UnknownCategory`] when `category` is not configured.
    pub fn snapshot_counts(&self, category: Category) -> Result<FeedbackTally, UnknownCategory> {
        self.ensure_known(category)?;
        let signals = self.lock();
        Ok(signals
            .get(&category)
            .map(|values| tally_values(values))
            .unwrap_or_default())
    }

    /// Point-in-time counts for every category, taken under one lock.
    #[must_use]
    pub fn snapshot(&self) -> FeedbackSnapshot {
        let signals = self.lock();
        FeedbackSnapshot::from_tallies(
            signals
                .iter()
                .map(|(&category, values)| (category, tally_values(values))),
        )
    }

    /// Copy of the signals recorded for `category`, oldest first.
    ///
    /// # Errors
    /// Returns [`UnknownCategory`] when `category` is not configured.
    pub fn signals(&self, category: Category) -> Result<Vec<FeedbackValue>, UnknownCategory> {
        self.ensure_known(category)?;
        Ok(self.lock().get(&category).cloned().unwrap_or_default())
    }

    /// Total number of signals across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Whether no signal has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_known(&self, category: Category) -> Result<(), UnknownCategory> {
        if self.categories.contains(&category) {
            Ok(())
        } else {
            Err(UnknownCategory::from(category))
        }
    }

    // A push either happened or it did not, so a poisoned guard still holds
    // consistent data.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<Category, Vec<FeedbackValue>>> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn tally_values(values: &[FeedbackValue]) -> FeedbackTally {
    let mut tally = FeedbackTally::default();
    for &value in values {
        tally.count(value);
    }
    tally
}
