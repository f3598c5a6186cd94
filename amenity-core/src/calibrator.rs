//! Adjust norms from accumulated feedback.
//!
//! The [`Calibrator`] trait turns a frozen [`FeedbackSnapshot`] and the
//! current [`NormTable`] into a complete replacement table. Implementations
//! are free to use any estimator, provided the result covers exactly the
//! categories of the input table with finite, non-negative norms.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Category, FeedbackSnapshot, NormTable, NormTableError};

/// Outcome of one calibration pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationResult {
    /// Complete table after the adjustment.
    pub table: NormTable,
    /// Change applied to each category's norm after clamping; `0.0` for
    /// categories that were carried over.
    pub deltas: BTreeMap<Category, f64>,
}

impl CalibrationResult {
    /// Change applied to `category`, `0.0` when none was recorded.
    #[must_use]
    pub fn delta(&self, category: Category) -> f64 {
        self.deltas.get(&category).copied().unwrap_or(0.0)
    }
}

/// Errors returned by [`Calibrator::calibrate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// The adjusted norms could not form a valid table.
    #[error("calibrated norms are invalid: {0}")]
    InvalidNorms(#[from] NormTableError),
}

/// Produce an updated norm table from a feedback snapshot.
///
/// Implementations must be `Send + Sync` so a shared calibrator can serve
/// concurrent callers, and must be pure with respect to their inputs: the
/// same snapshot and table always yield the same result.
///
/// # Examples
///
/// ```rust
/// use amenity_core::{
///     CalibrationError, CalibrationResult, Calibrator, FeedbackSnapshot, NormTable,
/// };
///
/// struct Frozen;
///
/// impl Calibrator for Frozen {
///     fn calibrate(
///         &self,
///         _feedback: &FeedbackSnapshot,
///         current: &NormTable,
///     ) -> Result<CalibrationResult, CalibrationError> {
///         Ok(CalibrationResult {
///             table: current.clone(),
///             deltas: current.categories().map(|c| (c, 0.0)).collect(),
///         })
///     }
/// }
///
/// let table = NormTable::with_defaults();
/// let result = Frozen.calibrate(&FeedbackSnapshot::default(), &table).unwrap();
/// assert_eq!(result.table, table);
/// ```
pub trait Calibrator: Send + Sync {
    /// Adjust `current` according to `feedback`.
    ///
    /// # Errors
    /// Returns [`CalibrationError`] when the adjusted norms are unusable.
    fn calibrate(
        &self,
        feedback: &FeedbackSnapshot,
        current: &NormTable,
    ) -> Result<CalibrationResult, CalibrationError>;
}
