//! Facility records supplied by the inventory collaborator.

use geo::Coord;

use crate::Category;

/// One real-world facility from an upstream inventory.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Both the
/// name and the location are optional: upstream sources routinely omit names,
/// and a representative point cannot always be derived from a geometry.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use amenity_core::{Category, FacilityRecord};
///
/// let record = FacilityRecord::new(Category::School)
///     .with_name("Lyceum 145")
///     .with_location(Coord { x: 30.52, y: 50.45 });
///
/// assert_eq!(record.display_name(), Some("Lyceum 145"));
/// assert!(record.representative_point().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityRecord {
    /// Category the facility is counted under.
    pub category: Category,
    /// Name as reported upstream, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Representative point, if one could be derived.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<Coord<f64>>,
}

impl FacilityRecord {
    /// Construct an unnamed facility without a location.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            name: None,
            location: None,
        }
    }

    /// Attach a name while returning `self` for chaining.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a representative point while returning `self` for chaining.
    #[must_use]
    pub const fn with_location(mut self, location: Coord<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Return the trimmed name, treating blank names as absent.
    ///
    /// # Examples
    /// ```
    /// use amenity_core::{Category, FacilityRecord};
    ///
    /// let record = FacilityRecord::new(Category::Park).with_name("   ");
    /// assert!(record.display_name().is_none());
    /// ```
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Return the location when both ordinates are finite.
    #[must_use]
    pub fn representative_point(&self) -> Option<Coord<f64>> {
        self.location
            .filter(|point| point.x.is_finite() && point.y.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("  \t"), None)]
    #[case(Some(" Central Library "), Some("Central Library"))]
    fn display_name_ignores_blanks(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let mut record = FacilityRecord::new(Category::Library);
        record.name = raw.map(str::to_owned);
        assert_eq!(record.display_name(), expected);
    }

    #[rstest]
    #[case(Coord { x: f64::NAN, y: 1.0 })]
    #[case(Coord { x: 1.0, y: f64::INFINITY })]
    fn non_finite_points_are_absent(#[case] point: Coord<f64>) {
        let record = FacilityRecord::new(Category::Gym).with_location(point);
        assert!(record.representative_point().is_none());
    }
}
