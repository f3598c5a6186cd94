//! Core domain types for the amenity adequacy engine.
//!
//! The crate holds the two pieces of shared state the engine relies on, the
//! [`NormTable`] (served through [`LiveNorms`]) and the [`FeedbackStore`],
//! together with the records scoring consumes and the [`Calibrator`] seam
//! used to adjust norms. Constructors validate their input and return
//! `Result` so bad upstream data surfaces early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod calibrator;
pub mod category;
pub mod city;
pub mod facility;
pub mod feedback;
pub mod norms;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use calibrator::{CalibrationError, CalibrationResult, Calibrator};
pub use category::{Category, UnknownCategory};
pub use city::{CityProfile, ProfileError};
pub use facility::FacilityRecord;
pub use feedback::{
    FeedbackSignal, FeedbackSnapshot, FeedbackStore, FeedbackTally, FeedbackValue,
    UnknownFeedbackValue,
};
pub use norms::{LiveNorms, NormEntry, NormTable, NormTableError};

/// Population unit the norms are expressed against.
pub const NORM_POPULATION_UNIT: u32 = 100_000;
