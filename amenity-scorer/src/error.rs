//! Error types raised while scoring a city.
#![forbid(unsafe_code)]

use amenity_core::{ProfileError, UnknownCategory};
use thiserror::Error;

/// Errors raised by [`score`](crate::score), [`score_all`](crate::score_all)
/// and [`build_report`](crate::build_report).
///
/// Each error is fatal to the request that raised it; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The requested category has no configured norm.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The city profile carried negative or non-finite values.
    #[error("invalid city profile: {0}")]
    InvalidProfile(#[from] ProfileError),
}
