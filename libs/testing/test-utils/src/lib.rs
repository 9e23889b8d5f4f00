//! Shared test utilities for the pricing domain
//!
//! This crate provides reusable test fixtures:
//! - `CatalogBuilder`: Deterministic log-management catalog with every
//!   retention variant and add-on SKU, with knobs to drop records
//! - `usage`: Usage snapshots used across tests
//! - `assertions`: Float assertion helpers
//!
//! # Usage
//!
//! ```rust
//! use domain_log_pricing::{BillingCadence, Estimator, RetentionWindow};
//! use test_utils::{usage, CatalogBuilder};
//!
//! let catalog = CatalogBuilder::datadog_logs()
//!     .without_retention(RetentionWindow::Days30)
//!     .build();
//!
//! let estimate = Estimator::new(&catalog, BillingCadence::BilledAnnually)
//!     .estimate(&usage::reference());
//! assert!(estimate.indexed_found);
//! ```

use domain_log_pricing::{
    AddOnKind, BillingCadence, Catalog, Product, RetentionWindow,
};

/// Annual, month-to-month and on-demand price per indexed-logs retention variant
const INDEXED_PRICES: &[(RetentionWindow, &str, &str, &str)] = &[
    (RetentionWindow::Days3, "$1.06", "$1.59", "$1.59"),
    (RetentionWindow::Days7, "$1.27", "$1.91", "$1.91"),
    (RetentionWindow::Days15, "$1.70", "$2.55", "$2.55"),
    (RetentionWindow::Days30, "$2.50", "$3.75", "$3.75"),
];

/// Builder for test catalogs
///
/// Product order is fixed so first-match behaviour is reproducible.
pub struct CatalogBuilder {
    include_ingestion: bool,
    retentions: Vec<RetentionWindow>,
    add_ons: Vec<AddOnKind>,
    extra: Vec<Product>,
}

impl CatalogBuilder {
    /// Ingestion, all four indexed retention variants and all add-ons
    pub fn datadog_logs() -> Self {
        Self {
            include_ingestion: true,
            retentions: INDEXED_PRICES.iter().map(|(w, ..)| *w).collect(),
            add_ons: vec![
                AddOnKind::ArchiveSearch,
                AddOnKind::FlexStorage,
                AddOnKind::Forwarding,
            ],
            extra: Vec::new(),
        }
    }

    pub fn without_ingestion(mut self) -> Self {
        self.include_ingestion = false;
        self
    }

    pub fn without_retention(mut self, window: RetentionWindow) -> Self {
        self.retentions.retain(|w| *w != window);
        self
    }

    pub fn without_add_on(mut self, kind: AddOnKind) -> Self {
        self.add_ons.retain(|k| *k != kind);
        self
    }

    /// Append a record after the generated ones
    pub fn with_product(mut self, product: Product) -> Self {
        self.extra.push(product);
        self
    }

    pub fn build(self) -> Catalog {
        let mut products = Vec::new();

        if self.include_ingestion {
            products.push(ingestion_product());
        }

        for (window, annual, monthly, on_demand) in INDEXED_PRICES {
            if self.retentions.contains(window) {
                products.push(
                    Product::new(
                        "Indexed Logs (Standard Tier)",
                        format!(
                            "per million log events, per month, {} retention",
                            window.token()
                        ),
                    )
                    .with_price(BillingCadence::BilledAnnually, *annual)
                    .with_price(BillingCadence::BilledMonthToMonth, *monthly)
                    .with_price(BillingCadence::OnDemand, *on_demand)
                    .with_category("Logs"),
                );
            }
        }

        for kind in &self.add_ons {
            products.push(add_on_product(*kind));
        }

        products.extend(self.extra);
        Catalog::from_products(products)
    }
}

fn ingestion_product() -> Product {
    Product::new("Ingested Logs", "per ingested or scanned GB, per month")
        .with_price(BillingCadence::BilledAnnually, "$0.10")
        .with_price(BillingCadence::BilledMonthToMonth, "$0.10")
        .with_price(BillingCadence::OnDemand, "$0.10")
        .with_category("Logs")
}

fn add_on_product(kind: AddOnKind) -> Product {
    let (unit, annual, on_demand) = match kind {
        AddOnKind::ArchiveSearch => ("per GB scanned", "$0.10", "-"),
        AddOnKind::FlexStorage => ("per million events stored, per month", "$0.05", "$0.075"),
        AddOnKind::Forwarding => ("per GB forwarded", "$0.25", "$0.30"),
    };
    Product::new(kind.catalog_name(), unit)
        .with_price(BillingCadence::BilledAnnually, annual)
        .with_price(BillingCadence::OnDemand, on_demand)
        .with_category("Logs")
}

/// Usage snapshots shared across tests
pub mod usage {
    use domain_log_pricing::{AddOnToggle, AddOns, RetentionWindow, UsageInput};

    /// 100 GB/month of 2 KB entries, 15% indexed with 15-day retention
    pub fn reference() -> UsageInput {
        UsageInput {
            ingested_gb: 100.0,
            avg_entry_kb: 2.0,
            indexing_percent: 15.0,
            retention: RetentionWindow::Days15,
            add_ons: AddOns::default(),
        }
    }

    /// Reference usage with every add-on enabled
    pub fn with_all_add_ons() -> UsageInput {
        UsageInput {
            add_ons: AddOns {
                archive_search: AddOnToggle::enabled(50.0),
                flex_storage: AddOnToggle::enabled(120.0),
                forwarding: AddOnToggle::enabled(30.0),
            },
            ..reference()
        }
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two floats agree to within a relative tolerance of 1e-9
    pub fn assert_close(actual: f64, expected: f64, context: &str) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
