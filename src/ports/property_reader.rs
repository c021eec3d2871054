//! Property Reader Port - read-only listing queries.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::listing::{
    MarketStats, MarketTimeframe, PropertyAttributes, PropertyFilter, PropertySummary,
    PropertyType, SoldComparable,
};

/// Read-only access to the CRM property catalog.
#[async_trait]
pub trait PropertyReader: Send + Sync {
    /// Searches active, published, available listings matching the filter,
    /// ordered by view count descending then creation time descending.
    async fn search(
        &self,
        filter: &PropertyFilter,
        limit: usize,
    ) -> Result<Vec<PropertySummary>, DomainError>;

    /// Finds sold listings comparable to the given attributes: same type,
    /// same bedroom/bathroom count, floor area within ±20%, most recently
    /// sold first.
    async fn find_similar_sold(
        &self,
        attributes: &PropertyAttributes,
        limit: usize,
    ) -> Result<Vec<SoldComparable>, DomainError>;

    /// Aggregates sold-property price statistics for a location and type
    /// over the lookback window. An empty sold set yields zero-count
    /// statistics, not an error.
    async fn market_stats(
        &self,
        location: &str,
        property_type: PropertyType,
        timeframe: MarketTimeframe,
    ) -> Result<MarketStats, DomainError>;
}
