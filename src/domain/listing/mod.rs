//! Listing module - property data as the gateway reads it.

mod filter;
mod market;
mod property;

pub use filter::PropertyFilter;
pub use market::{MarketStats, MarketTimeframe};
pub use property::{
    PropertyAttributes, PropertyStatus, PropertySummary, PropertyType, SoldComparable,
};
