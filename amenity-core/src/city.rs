//! City profiles resolved by an external geocoding collaborator.

use thiserror::Error;

/// Population and area baseline for one city.
///
/// A population of `0` means unknown, as does an area of `0.0`. Negative
/// values are representable so that bad upstream data can be rejected
/// explicitly rather than wrapping silently.
///
/// # Examples
/// ```
/// use amenity_core::CityProfile;
///
/// # fn main() -> Result<(), amenity_core::ProfileError> {
/// let city = CityProfile::new("Kyiv, Ukraine", 2_950_000, 839.0)?;
/// assert!(city.has_population());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityProfile {
    /// City name plus region disambiguator, e.g. `"Lviv, Ukraine"`.
    pub identifier: String,
    /// Resident count; `0` when unknown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub population: i64,
    /// Area in square kilometres; `0.0` when unknown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub area_km2: f64,
}

/// Errors returned when a [`CityProfile`] carries unusable values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// Population was below zero.
    #[error("population for {identifier} must not be negative (got {population})")]
    NegativePopulation {
        /// City the profile belongs to.
        identifier: String,
        /// Offending population value.
        population: i64,
    },
    /// Area was negative or not a finite number.
    #[error("area for {identifier} must be a finite non-negative number (got {area_km2})")]
    InvalidArea {
        /// City the profile belongs to.
        identifier: String,
        /// Offending area value.
        area_km2: f64,
    },
}

impl CityProfile {
    /// Validates and constructs a [`CityProfile`].
    ///
    /// # Errors
    /// Returns [`ProfileError`] for negative populations or negative and
    /// non-finite areas.
    pub fn new(
        identifier: impl Into<String>,
        population: i64,
        area_km2: f64,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            identifier: identifier.into(),
            population,
            area_km2,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Re-check a profile that may have been built field by field or
    /// deserialised.
    ///
    /// # Errors
    /// Returns [`ProfileError`] under the same conditions as [`Self::new`].
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.population < 0 {
            return Err(ProfileError::NegativePopulation {
                identifier: self.identifier.clone(),
                population: self.population,
            });
        }
        if !self.area_km2.is_finite() || self.area_km2 < 0.0 {
            return Err(ProfileError::InvalidArea {
                identifier: self.identifier.clone(),
                area_km2: self.area_km2,
            });
        }
        Ok(())
    }

    /// Whether a population baseline is available.
    #[must_use]
    pub const fn has_population(&self) -> bool {
        self.population > 0
    }

    /// Whether an area baseline is available.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.area_km2 > 0.0
    }
}
