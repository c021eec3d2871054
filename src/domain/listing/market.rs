//! Aggregated sold-property statistics for market analysis.

use serde::{Deserialize, Serialize};

/// Lookback window for market analysis, resolved from a timeframe token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarketTimeframe {
    Months3,
    #[default]
    Months6,
    Months12,
    Months24,
}

impl MarketTimeframe {
    /// Resolves a caller-supplied token. Unrecognized tokens fall back to
    /// six months.
    pub fn from_token(token: &str) -> Self {
        match token {
            "3months" => MarketTimeframe::Months3,
            "6months" => MarketTimeframe::Months6,
            "12months" => MarketTimeframe::Months12,
            "24months" => MarketTimeframe::Months24,
            _ => MarketTimeframe::Months6,
        }
    }

    /// Window length in months.
    pub fn months(&self) -> u32 {
        match self {
            MarketTimeframe::Months3 => 3,
            MarketTimeframe::Months6 => 6,
            MarketTimeframe::Months12 => 12,
            MarketTimeframe::Months24 => 24,
        }
    }

    /// Token form used in prompts and stored inputs.
    pub fn as_token(&self) -> &'static str {
        match self {
            MarketTimeframe::Months3 => "3months",
            MarketTimeframe::Months6 => "6months",
            MarketTimeframe::Months12 => "12months",
            MarketTimeframe::Months24 => "24months",
        }
    }
}

/// Sold-property price statistics over a window. An empty sold set is a
/// valid zero-count result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub avg_price: f64,
    pub avg_price_per_sqm: f64,
    pub total_sales: u64,
    pub min_price: f64,
    pub max_price: f64,
}

impl MarketStats {
    /// Zero-count statistics for an empty sold set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no sales fell inside the window.
    pub fn is_empty(&self) -> bool {
        self.total_sales == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens_resolve() {
        assert_eq!(MarketTimeframe::from_token("3months").months(), 3);
        assert_eq!(MarketTimeframe::from_token("12months").months(), 12);
        assert_eq!(MarketTimeframe::from_token("24months").months(), 24);
    }

    #[test]
    fn unknown_tokens_default_to_six_months() {
        assert_eq!(MarketTimeframe::from_token("1year").months(), 6);
        assert_eq!(MarketTimeframe::from_token("").months(), 6);
    }

    #[test]
    fn empty_stats_are_zero_count() {
        let stats = MarketStats::empty();
        assert!(stats.is_empty());
        assert_eq!(stats.avg_price, 0.0);
        assert_eq!(stats.total_sales, 0);
    }
}
