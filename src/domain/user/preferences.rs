//! Property preferences stored on the user profile, mergeable with
//! call-supplied overrides.

use serde::{Deserialize, Serialize};

use crate::domain::listing::PropertyType;

/// Acceptable price band for a buyer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BudgetRange {
    /// Creates a closed budget range.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Property preferences. All fields are optional so that a stored profile
/// and a per-call override can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPreferences {
    /// Acceptable property types (empty = any).
    #[serde(default)]
    pub property_types: Vec<PropertyType>,
    pub budget: Option<BudgetRange>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_area_sqm: Option<f64>,
    pub max_area_sqm: Option<f64>,
    /// Preferred locations, free-text as entered in the CRM.
    #[serde(default)]
    pub preferred_locations: Vec<String>,
}

impl PropertyPreferences {
    /// Merges call-supplied overrides into stored preferences.
    ///
    /// Call-supplied values win per field; stored values fill the gaps.
    pub fn merged_with(&self, overrides: &PropertyPreferences) -> PropertyPreferences {
        PropertyPreferences {
            property_types: if overrides.property_types.is_empty() {
                self.property_types.clone()
            } else {
                overrides.property_types.clone()
            },
            budget: overrides.budget.or(self.budget),
            min_bedrooms: overrides.min_bedrooms.or(self.min_bedrooms),
            min_bathrooms: overrides.min_bathrooms.or(self.min_bathrooms),
            min_area_sqm: overrides.min_area_sqm.or(self.min_area_sqm),
            max_area_sqm: overrides.max_area_sqm.or(self.max_area_sqm),
            preferred_locations: if overrides.preferred_locations.is_empty() {
                self.preferred_locations.clone()
            } else {
                overrides.preferred_locations.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_per_field() {
        let stored = PropertyPreferences {
            property_types: vec![PropertyType::Apartment],
            budget: Some(BudgetRange::between(100_000.0, 300_000.0)),
            min_bedrooms: Some(2),
            ..Default::default()
        };
        let overrides = PropertyPreferences {
            min_bedrooms: Some(3),
            ..Default::default()
        };

        let merged = stored.merged_with(&overrides);
        assert_eq!(merged.min_bedrooms, Some(3));
        assert_eq!(merged.property_types, vec![PropertyType::Apartment]);
        assert_eq!(
            merged.budget,
            Some(BudgetRange::between(100_000.0, 300_000.0))
        );
    }

    #[test]
    fn empty_override_keeps_stored_values() {
        let stored = PropertyPreferences {
            preferred_locations: vec!["Lisbon".to_string()],
            min_area_sqm: Some(50.0),
            ..Default::default()
        };

        let merged = stored.merged_with(&PropertyPreferences::default());
        assert_eq!(merged.preferred_locations, vec!["Lisbon".to_string()]);
        assert_eq!(merged.min_area_sqm, Some(50.0));
    }
}
