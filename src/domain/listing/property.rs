//! Property types mirroring the CRM listing catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProjectId, PropertyId};

/// Listing categories known to the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Townhouse,
    Studio,
    Penthouse,
    Commercial,
    Land,
}

impl PropertyType {
    /// Stable string form used in prompts and stored filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Studio => "studio",
            PropertyType::Penthouse => "penthouse",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Reserved,
    Sold,
    UnderConstruction,
    Maintenance,
}

/// A listing as returned by the property store for recommendation work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub project_id: Option<ProjectId>,
    pub property_type: PropertyType,
    pub total_price: f64,
    pub price_per_sqm: f64,
    pub total_area_sqm: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub total_views: u64,
    pub created_at: DateTime<Utc>,
}

/// A sold listing used as a price-prediction comparable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoldComparable {
    pub id: PropertyId,
    pub property_type: PropertyType,
    pub sale_price: f64,
    pub total_area_sqm: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub sold_at: DateTime<Utc>,
}

/// Attributes of the property being valued. This is caller-supplied data,
/// not necessarily an existing listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAttributes {
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub total_area_sqm: f64,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PropertyType::Townhouse).unwrap(),
            "\"townhouse\""
        );
        assert_eq!(PropertyType::Penthouse.as_str(), "penthouse");
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PropertyStatus::UnderConstruction).unwrap(),
            "\"under_construction\""
        );
    }
}
