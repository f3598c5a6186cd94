//! Feedback-driven adjustment of facility norms.
//!
//! [`ProportionalCalibrator`] is a simple proportional controller: every
//! category's norm moves by `(rejects - accepts) * sensitivity` and is
//! clamped at zero. It makes no statistical claim about the resulting
//! norms; deployments that need a principled estimator can supply their own
//! [`Calibrator`] instead.
//!
//! # Examples
//!
//! ```
//! use amenity_calibrator::ProportionalCalibrator;
//! use amenity_core::{Calibrator, Category, FeedbackSnapshot, FeedbackTally, NormTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let feedback = FeedbackSnapshot::from_tallies([(Category::Park, FeedbackTally::new(2, 8))]);
//! let result = ProportionalCalibrator::default().calibrate(&feedback, &NormTable::with_defaults())?;
//! assert!((result.table.get(Category::Park)?.per_100k - 5.56).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::collections::BTreeMap;

use amenity_core::{
    CalibrationError, CalibrationResult, Calibrator, FeedbackSnapshot, FeedbackTally, NormEntry,
    NormTable,
};
use log::{debug, info};
use thiserror::Error;

/// Norm change per unit of feedback balance used when none is configured.
pub const DEFAULT_SENSITIVITY: f64 = 0.01;

/// Errors raised by the proportional calibrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibratorError {
    /// Sensitivity was negative, NaN or infinite.
    #[error("sensitivity must be finite and non-negative, got {sensitivity}")]
    InvalidSensitivity {
        /// Rejected value.
        sensitivity: f64,
    },
    /// The adjusted norms could not form a table.
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Proportional feedback controller over a [`NormTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalCalibrator {
    sensitivity: f64,
}

impl ProportionalCalibrator {
    /// Build a calibrator with the given sensitivity.
    ///
    /// # Errors
    /// Returns [`CalibratorError::InvalidSensitivity`] unless `sensitivity` is
    /// finite and non-negative.
    pub fn new(sensitivity: f64) -> Result<Self, CalibratorError> {
        if sensitivity.is_finite() && sensitivity >= 0.0 {
            Ok(Self { sensitivity })
        } else {
            Err(CalibratorError::InvalidSensitivity { sensitivity })
        }
    }

    /// Norm change per unit of feedback balance.
    #[must_use]
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}

impl Default for ProportionalCalibrator {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Calibrator for ProportionalCalibrator {
    fn calibrate(
        &self,
        feedback: &FeedbackSnapshot,
        current: &NormTable,
    ) -> Result<CalibrationResult, CalibrationError> {
        let mut deltas = BTreeMap::new();
        let mut entries = Vec::with_capacity(current.len());
        for entry in current.iter() {
            let tally = feedback.tally(entry.category);
            let adjusted = adjust(entry.per_100k, tally, self.sensitivity);
            let applied = difference(adjusted, entry.per_100k);
            if !tally.is_empty() {
                info!(
                    "calibrated {}: {} -> {adjusted} (accept={}, reject={})",
                    entry.category, entry.per_100k, tally.accept, tally.reject
                );
            }
            deltas.insert(entry.category, applied);
            entries.push(NormEntry::new(entry.category, adjusted));
        }
        for (category, _) in feedback.iter().filter(|(c, _)| !current.contains(*c)) {
            debug!("ignoring feedback for unconfigured category {category}");
        }
        let table = NormTable::new(entries)?;
        Ok(CalibrationResult { table, deltas })
    }
}

/// Calibrate `current` against `snapshot` with a one-off sensitivity.
///
/// # Errors
/// Returns [`CalibratorError::InvalidSensitivity`] for an unusable
/// sensitivity and [`CalibratorError::Calibration`] when the adjusted norms
/// overflow to a non-finite value.
pub fn calibrate(
    snapshot: &FeedbackSnapshot,
    current: &NormTable,
    sensitivity: f64,
) -> Result<CalibrationResult, CalibratorError> {
    let calibrator = ProportionalCalibrator::new(sensitivity)?;
    Ok(calibrator.calibrate(snapshot, current)?)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "norms are real-valued and the balance is scaled by a real sensitivity"
)]
fn adjust(norm: f64, tally: FeedbackTally, sensitivity: f64) -> f64 {
    if tally.is_empty() {
        return norm;
    }
    let proposed = norm + tally.balance() as f64 * sensitivity;
    proposed.max(0.0)
}

#[expect(
    clippy::float_arithmetic,
    reason = "the applied delta is the difference of two norms"
)]
fn difference(adjusted: f64, original: f64) -> f64 {
    adjusted - original
}

#[cfg(test)]
mod tests;
