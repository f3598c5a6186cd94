//! Shared test harness modules for the amenity CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod calibrate_unit;
mod helpers;
mod report_unit;
