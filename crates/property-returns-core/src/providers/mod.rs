//! Collaborators the engine consumes but never depends on for its numbers.
//!
//! Market commentary is attached to a finished analysis; sample listings
//! stand in for real listing data when a caller has none.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::InvestmentAnalysis;
use crate::types::Money;

#[cfg(feature = "sample-data")]
pub mod sample;

#[cfg(feature = "sample-data")]
pub use sample::RandomSampleData;

// ---------------------------------------------------------------------------
// Market insight
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsight {
    pub summary: String,
    pub estimated_value_low: Option<Money>,
    pub estimated_value_high: Option<Money>,
    pub source: String,
}

/// Source of free-text market commentary for an address.
pub trait MarketInsightProvider {
    fn insight(&self, address: &str) -> Option<MarketInsight>;
}

/// Provider used when no commentary source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarketInsight;

impl MarketInsightProvider for NoMarketInsight {
    fn insight(&self, _address: &str) -> Option<MarketInsight> {
        None
    }
}

/// Add commentary to a completed analysis. Only the `insight` field is
/// touched; a provider with nothing to say leaves the analysis unchanged.
pub fn attach_insight(
    analysis: &mut InvestmentAnalysis,
    provider: &dyn MarketInsightProvider,
    address: &str,
) {
    match provider.insight(address) {
        Some(insight) => {
            log::debug!("attached market insight from {}", insight.source);
            analysis.insight = Some(insight);
        }
        None => log::debug!("no market insight available for '{address}'"),
    }
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Townhouse,
}

/// Placeholder listing record. Not real market data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleProperty {
    pub address: String,
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: Decimal,
    pub floor_area_sqm: u32,
    pub price: Money,
    pub year_built: u32,
    pub generated_on: String,
}

pub trait SampleDataProvider {
    fn property(&mut self, address: &str) -> SampleProperty;

    /// Up to `count` listings in `location` priced at or under `max_budget`.
    fn search(&mut self, location: &str, max_budget: Money, count: usize) -> Vec<SampleProperty>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInsight;

    impl MarketInsightProvider for FixedInsight {
        fn insight(&self, address: &str) -> Option<MarketInsight> {
            Some(MarketInsight {
                summary: format!("Steady demand around {address}"),
                estimated_value_low: None,
                estimated_value_high: None,
                source: "fixture".into(),
            })
        }
    }

    #[test]
    fn test_no_market_insight_returns_none() {
        assert_eq!(NoMarketInsight.insight("1 Collins St"), None);
    }

    #[test]
    fn test_fixture_provider_produces_summary() {
        let insight = FixedInsight.insight("1 Collins St").unwrap();
        assert!(insight.summary.contains("Collins"));
    }
}
