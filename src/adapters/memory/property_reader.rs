//! In-memory property reader with real filter/sort semantics over preset
//! listings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::listing::{
    MarketStats, MarketTimeframe, PropertyAttributes, PropertyFilter, PropertySummary,
    PropertyType, SoldComparable,
};
use crate::ports::PropertyReader;

/// In-memory PropertyReader for tests.
///
/// Search and comparable lookups apply the same matching rules the
/// production store contract promises; market statistics are preset per
/// (location, type) because aggregation windows need a clock the tests
/// control.
#[derive(Default)]
pub struct InMemoryPropertyReader {
    listings: RwLock<Vec<PropertySummary>>,
    sold: RwLock<Vec<SoldComparable>>,
    stats: RwLock<HashMap<(String, PropertyType), MarketStats>>,
}

impl InMemoryPropertyReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an available listing.
    pub fn with_listing(self, listing: PropertySummary) -> Self {
        self.listings
            .write()
            .expect("InMemoryPropertyReader: lock poisoned")
            .push(listing);
        self
    }

    /// Adds a sold comparable.
    pub fn with_sold(self, comparable: SoldComparable) -> Self {
        self.sold
            .write()
            .expect("InMemoryPropertyReader: lock poisoned")
            .push(comparable);
        self
    }

    /// Presets market statistics for a location/type pair.
    pub fn with_market_stats(
        self,
        location: impl Into<String>,
        property_type: PropertyType,
        stats: MarketStats,
    ) -> Self {
        self.stats
            .write()
            .expect("InMemoryPropertyReader: lock poisoned")
            .insert((location.into(), property_type), stats);
        self
    }

    fn matches(filter: &PropertyFilter, listing: &PropertySummary) -> bool {
        if !filter.property_types.is_empty()
            && !filter.property_types.contains(&listing.property_type)
        {
            return false;
        }
        if filter.min_price.is_some_and(|min| listing.total_price < min) {
            return false;
        }
        if filter.max_price.is_some_and(|max| listing.total_price > max) {
            return false;
        }
        if filter.min_bedrooms.is_some_and(|min| listing.bedrooms < min) {
            return false;
        }
        if filter
            .min_bathrooms
            .is_some_and(|min| listing.bathrooms < min)
        {
            return false;
        }
        if filter
            .min_area_sqm
            .is_some_and(|min| listing.total_area_sqm < min)
        {
            return false;
        }
        if filter
            .max_area_sqm
            .is_some_and(|max| listing.total_area_sqm > max)
        {
            return false;
        }
        true
    }
}

#[async_trait]
impl PropertyReader for InMemoryPropertyReader {
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: usize,
    ) -> Result<Vec<PropertySummary>, DomainError> {
        let mut matched: Vec<_> = self
            .listings
            .read()
            .expect("InMemoryPropertyReader: lock poisoned")
            .iter()
            .filter(|listing| Self::matches(filter, listing))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.total_views
                .cmp(&a.total_views)
                .then(b.created_at.cmp(&a.created_at))
        });
        matched.truncate(limit);
        Ok(matched)
    }

    async fn find_similar_sold(
        &self,
        attributes: &PropertyAttributes,
        limit: usize,
    ) -> Result<Vec<SoldComparable>, DomainError> {
        let min_area = attributes.total_area_sqm * 0.8;
        let max_area = attributes.total_area_sqm * 1.2;

        let mut matched: Vec<_> = self
            .sold
            .read()
            .expect("InMemoryPropertyReader: lock poisoned")
            .iter()
            .filter(|sold| {
                sold.property_type == attributes.property_type
                    && sold.bedrooms == attributes.bedrooms
                    && sold.bathrooms == attributes.bathrooms
                    && sold.total_area_sqm >= min_area
                    && sold.total_area_sqm <= max_area
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn market_stats(
        &self,
        location: &str,
        property_type: PropertyType,
        _timeframe: MarketTimeframe,
    ) -> Result<MarketStats, DomainError> {
        Ok(self
            .stats
            .read()
            .expect("InMemoryPropertyReader: lock poisoned")
            .get(&(location.to_string(), property_type))
            .cloned()
            .unwrap_or_else(MarketStats::empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::foundation::PropertyId;

    fn listing(views: u64, price: f64) -> PropertySummary {
        PropertySummary {
            id: PropertyId::new(),
            project_id: None,
            property_type: PropertyType::Apartment,
            total_price: price,
            price_per_sqm: price / 75.0,
            total_area_sqm: 75.0,
            bedrooms: 2,
            bathrooms: 1,
            location: "Porto".to_string(),
            features: vec![],
            total_views: views,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn search_orders_by_views_then_recency() {
        let reader = InMemoryPropertyReader::new()
            .with_listing(listing(5, 180_000.0))
            .with_listing(listing(50, 200_000.0))
            .with_listing(listing(20, 150_000.0));

        let results = reader.search(&PropertyFilter::default(), 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].total_views, 50);
        assert_eq!(results[1].total_views, 20);
    }

    #[tokio::test]
    async fn search_applies_price_bounds() {
        let reader = InMemoryPropertyReader::new()
            .with_listing(listing(1, 100_000.0))
            .with_listing(listing(2, 300_000.0));

        let filter = PropertyFilter {
            max_price: Some(150_000.0),
            ..Default::default()
        };
        let results = reader.search(&filter, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].total_price, 100_000.0);
    }

    #[tokio::test]
    async fn similar_sold_respects_area_band() {
        let attrs = PropertyAttributes {
            property_type: PropertyType::Apartment,
            bedrooms: 2,
            bathrooms: 1,
            total_area_sqm: 100.0,
            location: None,
        };

        let inside = SoldComparable {
            id: PropertyId::new(),
            property_type: PropertyType::Apartment,
            sale_price: 210_000.0,
            total_area_sqm: 110.0,
            bedrooms: 2,
            bathrooms: 1,
            sold_at: Utc::now(),
        };
        let outside = SoldComparable {
            total_area_sqm: 140.0,
            id: PropertyId::new(),
            sold_at: Utc::now() - Duration::days(3),
            ..inside.clone()
        };

        let reader = InMemoryPropertyReader::new()
            .with_sold(inside.clone())
            .with_sold(outside);

        let results = reader.find_similar_sold(&attrs, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, inside.id);
    }

    #[tokio::test]
    async fn missing_market_stats_are_zero_count() {
        let reader = InMemoryPropertyReader::new();
        let stats = reader
            .market_stats("Nowhere", PropertyType::Villa, MarketTimeframe::Months6)
            .await
            .unwrap();
        assert!(stats.is_empty());
    }
}
