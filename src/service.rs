//! Shared-state coordinator for scoring, feedback and calibration.
#![forbid(unsafe_code)]

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use amenity_calibrator::ProportionalCalibrator;
use amenity_core::{
    CalibrationError, CalibrationResult, Calibrator, Category, CityProfile, FacilityRecord,
    FeedbackSnapshot, FeedbackStore, FeedbackValue, LiveNorms, NormTable, NormTableError,
    UnknownCategory,
};
use amenity_scorer::{AnalyticsReport, MessageTemplates, ScoreError, ScoreResult};
use log::{debug, info};
use thiserror::Error;

/// Errors surfaced by [`AdequacyService`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Scoring or report generation failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// Feedback named a category without a norm.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The calibrator could not produce a table.
    #[error("calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
    /// The calibrated table could not be installed.
    #[error("calibrated table rejected: {0}")]
    NormTable(#[from] NormTableError),
}

/// Owns the live norms and the feedback store for one deployment.
///
/// Every method takes `&self`, so one service can be shared across threads
/// behind an `Arc`. Scoring reads a single table snapshot per request;
/// calibration replaces the table with one atomic swap. Recalibration only
/// consumes signals recorded since the previous pass, so running it twice
/// without new feedback leaves the norms unchanged.
pub struct AdequacyService {
    baseline: NormTable,
    norms: LiveNorms,
    feedback: FeedbackStore,
    calibrator: Box<dyn Calibrator>,
    messages: MessageTemplates,
    applied: Mutex<FeedbackSnapshot>,
}

impl AdequacyService {
    /// Serve `baseline` with the default [`ProportionalCalibrator`].
    #[must_use]
    pub fn new(baseline: NormTable) -> Self {
        Self::with_calibrator(baseline, ProportionalCalibrator::default())
    }

    /// Serve `baseline`, adjusting it with `calibrator`.
    #[must_use]
    pub fn with_calibrator(baseline: NormTable, calibrator: impl Calibrator + 'static) -> Self {
        Self {
            norms: LiveNorms::new(baseline.clone()),
            feedback: FeedbackStore::for_table(&baseline),
            baseline,
            calibrator: Box::new(calibrator),
            messages: MessageTemplates::default(),
            applied: Mutex::new(FeedbackSnapshot::default()),
        }
    }

    /// Replace the English templates used for verdicts and acknowledgements.
    #[must_use]
    pub fn with_messages(mut self, messages: MessageTemplates) -> Self {
        self.messages = messages;
        self
    }

    /// Templates used to phrase results and acknowledgements.
    #[must_use]
    pub const fn messages(&self) -> &MessageTemplates {
        &self.messages
    }

    /// Phrase a scoring result with the configured templates.
    #[must_use]
    pub fn render(&self, result: &ScoreResult) -> String {
        self.messages.render(result)
    }

    /// Norms configured at start-up, before any calibration.
    #[must_use]
    pub const fn baseline(&self) -> &NormTable {
        &self.baseline
    }

    /// Norms currently in force.
    #[must_use]
    pub fn norms(&self) -> Arc<NormTable> {
        self.norms.load()
    }

    /// Feedback recorded so far.
    #[must_use]
    pub const fn feedback(&self) -> &FeedbackStore {
        &self.feedback
    }

    /// Score one category against the live norms.
    ///
    /// # Errors
    /// Returns [`ServiceError::Score`] for an unusable profile or an
    /// unconfigured category.
    pub fn score(
        &self,
        inventory: &[FacilityRecord],
        profile: &CityProfile,
        category: Category,
    ) -> Result<ScoreResult, ServiceError> {
        let norms = self.norms.load();
        Ok(amenity_scorer::score(inventory, profile, &norms, category)?)
    }

    /// Score every configured category against one table snapshot.
    ///
    /// # Errors
    /// Returns [`ServiceError::Score`] for an unusable profile.
    pub fn score_all(
        &self,
        inventory: &[FacilityRecord],
        profile: &CityProfile,
    ) -> Result<Vec<ScoreResult>, ServiceError> {
        let norms = self.norms.load();
        Ok(amenity_scorer::score_all(inventory, profile, &norms)?)
    }

    /// Record a user's judgement of a recommendation and return the
    /// acknowledgement to show them.
    ///
    /// # Errors
    /// Returns [`ServiceError::UnknownCategory`] for an unconfigured category;
    /// nothing is recorded in that case.
    pub fn submit_feedback(
        &self,
        category: Category,
        value: FeedbackValue,
    ) -> Result<&str, ServiceError> {
        self.feedback.record(category, value)?;
        Ok(self.messages.render_feedback_ack(value))
    }

    /// Fold feedback recorded since the previous pass into the live norms.
    ///
    /// Passes are serialised; feedback submission and scoring continue while
    /// one runs. The returned deltas are relative to the table in force when
    /// the pass started.
    ///
    /// # Errors
    /// Returns [`ServiceError::Calibration`] or [`ServiceError::NormTable`]
    /// when the calibrated table is unusable; the live table and the applied
    /// feedback are then left as they were.
    pub fn recalibrate(&self) -> Result<CalibrationResult, ServiceError> {
        let mut applied = self.lock_applied();
        let snapshot = self.feedback.snapshot();
        let pending = snapshot.since(&applied);
        let current = self.norms.load();

        if pending.is_empty() {
            debug!("no new feedback since the last calibration");
            return Ok(CalibrationResult {
                table: current.as_ref().clone(),
                deltas: current.categories().map(|category| (category, 0.0)).collect(),
            });
        }

        let result = self.calibrator.calibrate(&pending, &current)?;
        self.norms.replace(result.table.clone())?;
        *applied = snapshot;
        info!("recalibrated norms from {} categories of feedback", pending.iter().count());
        Ok(result)
    }

    /// Build the analytics report for a city against the baseline and live
    /// norms.
    ///
    /// # Errors
    /// Returns [`ServiceError::Score`] for an unusable profile.
    pub fn report(
        &self,
        inventory: &[FacilityRecord],
        profile: &CityProfile,
    ) -> Result<AnalyticsReport, ServiceError> {
        let calibrated = self.norms.load();
        Ok(amenity_scorer::build_report(
            inventory,
            profile,
            &self.baseline,
            &calibrated,
        )?)
    }

    fn lock_applied(&self) -> MutexGuard<'_, FeedbackSnapshot> {
        self.applied.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AdequacyService {
    fn default() -> Self {
        Self::new(NormTable::with_defaults())
    }
}

impl fmt::Debug for AdequacyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdequacyService")
            .field("baseline", &self.baseline)
            .field("norms", &self.norms)
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}
