//! Public output types for adequacy scoring.
#![forbid(unsafe_code)]

use amenity_core::{Category, FacilityRecord};
use serde::{Deserialize, Serialize};

/// Whether a city meets the norm for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Observed facilities meet or exceed the requirement.
    Adequate,
    /// Observed facilities fall short of the requirement.
    Inadequate,
}

impl Verdict {
    /// Derive the verdict from a deficit.
    #[must_use]
    pub const fn from_deficit(deficit: u64) -> Self {
        if deficit == 0 {
            Self::Adequate
        } else {
            Self::Inadequate
        }
    }

    /// Return the verdict as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adequate => "adequate",
            Self::Inadequate => "inadequate",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A displayable facility for the presentation layer's map.
///
/// Only facilities with a derivable representative point become markers; the
/// name stays absent when upstream had none, and is never replaced with
/// placeholder text here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Facility name, absent when blank or missing upstream.
    pub name: Option<String>,
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lon: f64,
}

impl Marker {
    /// Build a marker when the record carries a usable point.
    #[must_use]
    pub fn from_record(record: &FacilityRecord) -> Option<Self> {
        record.representative_point().map(|point| Self {
            name: record.display_name().map(str::to_owned),
            lat: point.y,
            lon: point.x,
        })
    }
}

/// Adequacy of one category in one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Category that was scored.
    pub category: Category,
    /// Every facility of the category in the inventory, named or not.
    pub observed_count: u64,
    /// Facilities of the category that carry a non-blank name.
    pub named_count: u64,
    /// Facilities the norm demands for the city's population.
    pub required_count: u64,
    /// `max(0, required_count - observed_count)`.
    pub deficit: u64,
    /// Adequate exactly when the deficit is zero.
    pub verdict: Verdict,
    /// Facilities that can be shown on a map.
    pub locations: Vec<Marker>,
}

impl ScoreResult {
    /// Whether the category meets its norm.
    #[must_use]
    pub fn is_adequate(&self) -> bool {
        self.verdict == Verdict::Adequate
    }
}
