//! Facility categories tracked by the adequacy engine.
//!
//! The enum is a closed set; adding a category means shipping a new build and
//! a norm table entry for it.
//!
//! # Examples
//! ```
//! use amenity_core::Category;
//!
//! assert_eq!(Category::School.as_str(), "school");
//! assert_eq!(Category::Pharmacy.to_string(), "pharmacy");
//! ```

use thiserror::Error;

/// A kind of public facility counted against a per-capita norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Category {
    /// Primary and secondary schools.
    School,
    /// Hospitals and inpatient clinics.
    Hospital,
    /// Public parks and green spaces.
    Park,
    /// Restaurants and cafes.
    Restaurant,
    /// Pharmacies and chemists.
    Pharmacy,
    /// Gyms and sports centres.
    Gym,
    /// Public libraries.
    Library,
    /// Shopping malls.
    Mall,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 8] = [
        Self::School,
        Self::Hospital,
        Self::Park,
        Self::Restaurant,
        Self::Pharmacy,
        Self::Gym,
        Self::Library,
        Self::Mall,
    ];

    /// Return the category as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use amenity_core::Category;
    ///
    /// assert_eq!(Category::Hospital.as_str(), "hospital");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::School => "school",
            Self::Hospital => "hospital",
            Self::Park => "park",
            Self::Restaurant => "restaurant",
            Self::Pharmacy => "pharmacy",
            Self::Gym => "gym",
            Self::Library => "library",
            Self::Mall => "mall",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory::new(wanted))
    }
}

/// A category was requested that is not part of the configured set.
///
/// Fatal to the request that raised it, never to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown facility category '{name}'")]
pub struct UnknownCategory {
    /// The category name as supplied by the caller.
    pub name: String,
}

impl UnknownCategory {
    /// Build the error for a raw category name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<Category> for UnknownCategory {
    fn from(category: Category) -> Self {
        Self::new(category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Category::Park.to_string(), Category::Park.as_str());
    }

    #[rstest]
    #[case("school", Category::School)]
    #[case("SCHOOL", Category::School)]
    #[case(" mall ", Category::Mall)]
    fn parsing_is_case_insensitive(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(Category::from_str(raw), Ok(expected));
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Category::from_str("stadium").unwrap_err();
        assert_eq!(err.name, "stadium");
        assert!(err.to_string().contains("unknown facility category"));
    }

    #[test]
    fn all_round_trips_through_names() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Ok(category));
        }
    }
}
