//! Full recomputation pipeline.
//!
//! ```text
//! UsageInput ──► DerivedQuantities ─────────────────┐
//!                                                    ├─► CostBreakdown
//! Catalog ──► MatchedProducts ──► UnitPrices ────────┘
//!                    │
//!                    └──────────────► QuoteItems
//! ```
//!
//! Every call to [`Estimator::estimate`] re-evaluates the whole chain from
//! the input snapshot, so no partially updated state is ever observable.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::catalog::Catalog;
use crate::costs::{compute_costs, CostBreakdown};
use crate::error::LogPricingResult;
use crate::matcher::{match_all, MatchedProducts};
use crate::models::{AddOns, BillingCadence, Category, UsageInput};
use crate::price::{unit_prices, UnitPrices};
use crate::quantities::DerivedQuantities;
use crate::quote::{build_items, commit_items, QuoteItem, QuoteSink};

/// Prices usage snapshots against one read-only catalog
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    catalog: &'a Catalog,
    cadence: BillingCadence,
}

impl<'a> Estimator<'a> {
    pub fn new(catalog: &'a Catalog, cadence: BillingCadence) -> Self {
        Self { catalog, cadence }
    }

    pub fn cadence(&self) -> BillingCadence {
        self.cadence
    }

    /// Run the pipeline for one input snapshot
    pub fn estimate(&self, input: &UsageInput) -> Estimate<'a> {
        let quantities = DerivedQuantities::compute(input);
        let matches = match_all(self.catalog.products(), input.retention);
        let unit_prices = unit_prices(&matches, self.cadence);
        let costs = compute_costs(&quantities, &unit_prices, &input.add_ons);

        let estimate = Estimate {
            ingestion_found: matches.found(Category::Ingestion),
            indexed_found: matches.found(Category::IndexedLogs),
            add_ons: input.add_ons,
            quantities,
            matches,
            unit_prices,
            costs,
        };

        tracing::debug!(
            retention = %input.retention,
            cadence = %self.cadence,
            indexed_millions = estimate.quantities.indexed_in_millions,
            total = estimate.costs.total,
            ingestion_found = estimate.ingestion_found,
            indexed_found = estimate.indexed_found,
            "Recomputed estimate"
        );

        estimate
    }
}

/// Result of one recomputation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate<'a> {
    pub quantities: DerivedQuantities,
    pub matches: MatchedProducts<'a>,
    pub unit_prices: UnitPrices,
    pub costs: CostBreakdown,
    /// Add-on flags the estimate was computed with
    pub add_ons: AddOns,
    pub ingestion_found: bool,
    pub indexed_found: bool,
}

impl Estimate<'_> {
    /// Whether the caller should show the "sync pricing data" warning.
    /// Only catalog misses on mandatory categories count.
    pub fn needs_pricing_sync(&self) -> bool {
        !self.ingestion_found || !self.indexed_found
    }

    /// Mandatory categories the catalog has no product for
    pub fn missing_products(&self) -> Vec<Category> {
        Category::iter()
            .filter(|c| c.is_mandatory() && !self.matches.found(*c))
            .collect()
    }

    pub fn quote_items(&self) -> Vec<QuoteItem> {
        build_items(&self.matches, &self.quantities, &self.add_ons)
    }

    /// Finalize the selection: build the quote items and hand them to the sink
    pub fn commit(&self, sink: &dyn QuoteSink) -> LogPricingResult<usize> {
        commit_items(self.quote_items(), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddOnToggle, Product, RetentionWindow};
    use crate::quote::MockQuoteSink;

    fn catalog() -> Catalog {
        Catalog::from_products(vec![
            Product::new("Ingested Logs", "per ingested GB, per month")
                .with_price(BillingCadence::BilledAnnually, "$0.10")
                .with_price(BillingCadence::OnDemand, "$0.15"),
            Product::new(
                "Indexed Logs (Standard Tier)",
                "per million log events, per month, 15-day retention",
            )
            .with_price(BillingCadence::BilledAnnually, "$1.70")
            .with_price(BillingCadence::OnDemand, "$2.55"),
            Product::new("Log Forwarding to Custom Destinations", "per GB forwarded")
                .with_price(BillingCadence::BilledAnnually, "$0.25"),
        ])
    }

    fn input() -> UsageInput {
        UsageInput {
            ingested_gb: 100.0,
            avg_entry_kb: 2.0,
            indexing_percent: 15.0,
            retention: RetentionWindow::Days15,
            add_ons: AddOns {
                forwarding: AddOnToggle::enabled(20.0),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_estimate_end_to_end() {
        let catalog = catalog();
        let estimate = Estimator::new(&catalog, BillingCadence::BilledAnnually).estimate(&input());

        assert!(estimate.ingestion_found);
        assert!(estimate.indexed_found);
        assert!(!estimate.needs_pricing_sync());

        let expected_indexed = 7.86432 * 1.70;
        assert!((estimate.costs.category(Category::IndexedLogs) - expected_indexed).abs() < 1e-9);
        assert!((estimate.costs.category(Category::Ingestion) - 10.0).abs() < 1e-9);
        assert!((estimate.costs.category(Category::Forwarding) - 5.0).abs() < 1e-9);
        assert!((estimate.costs.annualized - estimate.costs.total * 12.0).abs() < 1e-9);

        let quantities: Vec<u64> = estimate.quote_items().iter().map(|i| i.quantity()).collect();
        assert_eq!(quantities, vec![100, 8, 20]);
    }

    #[test]
    fn test_cadence_selects_price_column() {
        let catalog = catalog();
        let estimate = Estimator::new(&catalog, BillingCadence::OnDemand).estimate(&input());

        assert_eq!(estimate.unit_prices[&Category::IndexedLogs], 2.55);
        // no on-demand column for forwarding
        assert_eq!(estimate.unit_prices[&Category::Forwarding], 0.0);
        assert_eq!(estimate.costs.category(Category::Forwarding), 0.0);
    }

    #[test]
    fn test_missing_retention_variant_degrades() {
        let catalog = catalog();
        let mut usage = input();
        usage.retention = RetentionWindow::Days30;

        let estimate = Estimator::new(&catalog, BillingCadence::BilledAnnually).estimate(&usage);

        assert!(!estimate.indexed_found);
        assert!(estimate.needs_pricing_sync());
        assert_eq!(estimate.missing_products(), vec![Category::IndexedLogs]);
        assert_eq!(estimate.costs.category(Category::IndexedLogs), 0.0);
    }

    #[test]
    fn test_disabled_add_on_is_not_a_catalog_miss() {
        let catalog = catalog();
        let mut usage = input();
        usage.add_ons.forwarding.set_enabled(false);

        let estimate = Estimator::new(&catalog, BillingCadence::BilledAnnually).estimate(&usage);

        assert!(!estimate.needs_pricing_sync());
        assert!(estimate.missing_products().is_empty());
        assert_eq!(estimate.quote_items().len(), 2);
    }

    #[test]
    fn test_commit_hands_items_to_sink() {
        let catalog = catalog();
        let estimate = Estimator::new(&catalog, BillingCadence::BilledAnnually).estimate(&input());

        let mut sink = MockQuoteSink::new();
        sink.expect_commit()
            .withf(|items| items.len() == 3)
            .times(1)
            .returning(|_| Ok(()));

        assert_eq!(estimate.commit(&sink).unwrap(), 3);
    }
}
