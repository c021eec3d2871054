//! Structured search filter derived from merged preferences.

use serde::{Deserialize, Serialize};

use crate::domain::user::PropertyPreferences;

use super::PropertyType;

/// Search filter the property store understands.
///
/// Only active, published, available listings are ever matched; the
/// remaining fields narrow within that set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Type whitelist (empty = any type).
    #[serde(default)]
    pub property_types: Vec<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_area_sqm: Option<f64>,
    pub max_area_sqm: Option<f64>,
}

impl PropertyFilter {
    /// Translates merged preferences into a search filter.
    pub fn from_preferences(preferences: &PropertyPreferences) -> Self {
        let (min_price, max_price) = match preferences.budget {
            Some(range) => (range.min, range.max),
            None => (None, None),
        };

        Self {
            property_types: preferences.property_types.clone(),
            min_price,
            max_price,
            min_bedrooms: preferences.min_bedrooms,
            min_bathrooms: preferences.min_bathrooms,
            min_area_sqm: preferences.min_area_sqm,
            max_area_sqm: preferences.max_area_sqm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::BudgetRange;

    #[test]
    fn filter_carries_budget_bounds() {
        let preferences = PropertyPreferences {
            property_types: vec![PropertyType::Villa, PropertyType::House],
            budget: Some(BudgetRange::between(200_000.0, 500_000.0)),
            min_bedrooms: Some(3),
            ..Default::default()
        };

        let filter = PropertyFilter::from_preferences(&preferences);
        assert_eq!(filter.min_price, Some(200_000.0));
        assert_eq!(filter.max_price, Some(500_000.0));
        assert_eq!(filter.min_bedrooms, Some(3));
        assert_eq!(filter.property_types.len(), 2);
    }

    #[test]
    fn empty_preferences_make_an_open_filter() {
        let filter = PropertyFilter::from_preferences(&PropertyPreferences::default());
        assert_eq!(filter, PropertyFilter::default());
    }
}
