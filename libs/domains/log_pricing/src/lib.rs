//! Log Pricing Domain
//!
//! Pricing estimation for log management: given a catalog of priced product
//! records and a usage snapshot (ingested volume, entry size, indexing
//! share, retention window, optional add-ons), computes matched products,
//! billing quantities, unit prices, a monthly/annual cost breakdown and the
//! quote items handed to an external quote store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Estimator  │  ← Ordered, pure recomputation pipeline
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────────────────────┐
//! │ quantities · matcher · price · costs · quote    │  ← Pipeline stages
//! └──────┬──────────────────────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Products, usage input, categories
//! └─────────────┘
//! ```
//!
//! The pipeline is synchronous and never fails: unmatched products and
//! unparsable prices degrade to zero and surface as "not found" flags.

pub mod catalog;
pub mod costs;
pub mod error;
pub mod estimator;
pub mod matcher;
pub mod models;
pub mod price;
pub mod quantities;
pub mod quote;
pub mod templates;

// Re-export commonly used types
pub use catalog::{diff_catalogs, Catalog, ChangeKind, PricingChange};
pub use costs::{compute_costs, CostBreakdown};
pub use error::{LogPricingError, LogPricingResult};
pub use estimator::{Estimate, Estimator};
pub use matcher::{find_product, match_all, MatchCriteria, MatchedProducts};
pub use models::{
    generate_product_id, AddOnKind, AddOnToggle, AddOns, BillingCadence, Category, PlanTier,
    Product, Region, RetentionWindow, UsageInput,
};
pub use price::{parse_percentage, parse_unit_price, unit_prices, UnitPrices};
pub use quantities::DerivedQuantities;
pub use quote::{build_items, commit_items, QuoteItem, QuoteSink};
pub use templates::{default_templates, find_template, QuoteTemplate, TemplateItem};
