//! Facade crate for the amenity adequacy engine.
//!
//! This crate re-exports the domain types, the scoring and calibration
//! functions, and provides [`AdequacyService`], which owns the live norm
//! table and the feedback store shared by concurrent requests.
//!
//! # Examples
//!
//! ```
//! use amenity_engine::{AdequacyService, Category, FeedbackValue, NormTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = AdequacyService::new(NormTable::with_defaults());
//! let mut ack = "";
//! for _ in 0..10 {
//!     ack = service.submit_feedback(Category::Park, FeedbackValue::Reject)?;
//! }
//! assert_eq!(
//!     ack,
//!     "We will take your feedback into account and improve the recommendation."
//! );
//! let result = service.recalibrate()?;
//! assert!(result.delta(Category::Park) > 0.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod service;

pub use amenity_calibrator::{
    CalibratorError, DEFAULT_SENSITIVITY, ProportionalCalibrator, calibrate,
};
pub use amenity_core::{
    CalibrationError, CalibrationResult, Calibrator, Category, CityProfile, FacilityRecord,
    FeedbackSignal, FeedbackSnapshot, FeedbackStore, FeedbackTally, FeedbackValue, LiveNorms,
    NORM_POPULATION_UNIT, NormEntry, NormTable, NormTableError, ProfileError, UnknownCategory,
    UnknownFeedbackValue,
};
pub use amenity_scorer::{
    AnalyticsReport, CategoryAnalytics, Locale, Marker, MessageTemplates, ScoreError, ScoreResult,
    UnknownLocale, Verdict, build_report, required_count, score, score_all,
};
pub use service::{AdequacyService, ServiceError};
