use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{LogPricingError, LogPricingResult};

/// Default ingested volume offered by the estimator (GB per month)
pub const DEFAULT_INGESTED_GB: f64 = 100.0;
/// Default average log entry size (KB)
pub const DEFAULT_AVG_ENTRY_KB: f64 = 2.0;
/// Default share of ingested logs that get indexed (percent)
pub const DEFAULT_INDEXING_PERCENT: f64 = 15.0;

/// Price column of a catalog record
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BillingCadence {
    #[default]
    BilledAnnually,
    BilledMonthToMonth,
    OnDemand,
}

/// Datadog site a catalog was collected for
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
)]
pub enum Region {
    #[default]
    #[serde(rename = "us")]
    #[strum(serialize = "us")]
    Us,
    #[serde(rename = "us1-fed")]
    #[strum(serialize = "us1-fed")]
    Us1Fed,
    #[serde(rename = "eu1")]
    #[strum(serialize = "eu1")]
    Eu1,
    #[serde(rename = "ap1")]
    #[strum(serialize = "ap1")]
    Ap1,
    #[serde(rename = "ap2")]
    #[strum(serialize = "ap2")]
    Ap2,
}

impl Region {
    /// Human readable site name as shown on the pricing page selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Us => "US (US1, US3, US5)",
            Region::Us1Fed => "US1-FED",
            Region::Eu1 => "EU1",
            Region::Ap1 => "AP1",
            Region::Ap2 => "AP2",
        }
    }

    /// File name of the catalog snapshot for this site
    pub fn catalog_file_name(&self) -> String {
        format!("pricing-{}.json", self)
    }
}

/// Plan tier a product belongs to, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default)]
pub enum PlanTier {
    Enterprise,
    Pro,
    #[default]
    All,
}

impl PlanTier {
    /// `Enterprise` wins over `Pro`; anything else is available to all plans.
    pub fn from_product_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("enterprise") {
            PlanTier::Enterprise
        } else if lower.contains("pro") {
            PlanTier::Pro
        } else {
            PlanTier::All
        }
    }
}

/// Retention window of indexed logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Default)]
pub enum RetentionWindow {
    Days3,
    Days7,
    #[default]
    Days15,
    Days30,
}

impl RetentionWindow {
    pub fn days(&self) -> u32 {
        match self {
            RetentionWindow::Days3 => 3,
            RetentionWindow::Days7 => 7,
            RetentionWindow::Days15 => 15,
            RetentionWindow::Days30 => 30,
        }
    }

    /// Token the catalog uses in billing units, e.g. `15-day`
    pub fn token(&self) -> String {
        format!("{}-day", self.days())
    }
}

impl fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl TryFrom<u32> for RetentionWindow {
    type Error = LogPricingError;

    fn try_from(days: u32) -> LogPricingResult<Self> {
        RetentionWindow::iter()
            .find(|w| w.days() == days)
            .ok_or_else(|| {
                LogPricingError::InvalidInput(format!(
                    "unsupported retention window: {} days (expected 3, 7, 15 or 30)",
                    days
                ))
            })
    }
}

impl From<RetentionWindow> for u32 {
    fn from(window: RetentionWindow) -> Self {
        window.days()
    }
}

impl FromStr for RetentionWindow {
    type Err = LogPricingError;

    /// Accepts `15`, `15d` and `15-day`
    fn from_str(s: &str) -> LogPricingResult<Self> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed
            .strip_suffix("-day")
            .or_else(|| trimmed.strip_suffix('d'))
            .unwrap_or(&trimmed);
        let days: u32 = digits.parse().map_err(|_| {
            LogPricingError::InvalidInput(format!("invalid retention window: {}", s))
        })?;
        RetentionWindow::try_from(days)
    }
}

impl Serialize for RetentionWindow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.days())
    }
}

impl<'de> Deserialize<'de> for RetentionWindow {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = u32::deserialize(deserializer)?;
        RetentionWindow::try_from(days).map_err(serde::de::Error::custom)
    }
}

/// Optional, independently toggled log capabilities.
///
/// Declaration order is the configured add-on order used for quote items.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddOnKind {
    /// Querying archived logs, billed per GB scanned
    ArchiveSearch,
    /// Long-term storage, billed per million events stored
    FlexStorage,
    /// Forwarding to custom destinations, billed per GB forwarded
    Forwarding,
}

impl AddOnKind {
    /// Exact catalog name of the single SKU backing this add-on
    pub fn catalog_name(&self) -> &'static str {
        match self {
            AddOnKind::ArchiveSearch => "Log Archive Search",
            AddOnKind::FlexStorage => "Flex Logs Storage",
            AddOnKind::Forwarding => "Log Forwarding to Custom Destinations",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            AddOnKind::ArchiveSearch => Category::ArchiveSearch,
            AddOnKind::FlexStorage => Category::FlexStorage,
            AddOnKind::Forwarding => Category::Forwarding,
        }
    }
}

/// Cost category of an estimate.
///
/// Declaration order is the quote-item precedence: ingestion, indexed
/// logs, then add-ons in their configured order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Ingestion,
    IndexedLogs,
    ArchiveSearch,
    FlexStorage,
    Forwarding,
}

impl Category {
    /// Ingestion and indexed logs must exist in every usable catalog
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Category::Ingestion | Category::IndexedLogs)
    }

    pub fn add_on(&self) -> Option<AddOnKind> {
        match self {
            Category::Ingestion | Category::IndexedLogs => None,
            Category::ArchiveSearch => Some(AddOnKind::ArchiveSearch),
            Category::FlexStorage => Some(AddOnKind::FlexStorage),
            Category::Forwarding => Some(AddOnKind::Forwarding),
        }
    }
}

/// Deterministic product identifier: first 12 hex chars of
/// SHA-256 over `name|billing_unit`, both trimmed and lowercased.
pub fn generate_product_id(name: &str, billing_unit: &str) -> String {
    let key = format!(
        "{}|{}",
        name.trim().to_lowercase(),
        billing_unit.trim().to_lowercase()
    );
    let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
    digest[..12].to_string()
}

/// Priced catalog record (read-only for the pricing core)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProduct")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub billing_unit: String,
    /// Free-text price per billing cadence, e.g. `"$1.70"`, `"-"`, `"15%"`
    pub price_by_quantity: BTreeMap<BillingCadence, String>,
    pub plan: PlanTier,
    pub category: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, billing_unit: impl Into<String>) -> Self {
        let name = name.into();
        let billing_unit = billing_unit.into();
        Self {
            id: generate_product_id(&name, &billing_unit),
            plan: PlanTier::from_product_name(&name),
            name,
            billing_unit,
            price_by_quantity: BTreeMap::new(),
            category: None,
        }
    }

    pub fn with_price(mut self, cadence: BillingCadence, price: impl Into<String>) -> Self {
        self.price_by_quantity.insert(cadence, price.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Raw price text for a cadence, if the catalog carries that column
    pub fn price(&self, cadence: BillingCadence) -> Option<&str> {
        self.price_by_quantity.get(&cadence).map(String::as_str)
    }
}

/// Wire shape of a catalog record.
///
/// Accepts both the normalized `price_by_quantity` map and the scraped
/// column layout (`product`, `billed_annually`, `billed_month_to_month`,
/// `on_demand`).
#[derive(Deserialize)]
struct RawProduct {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "product")]
    name: String,
    #[serde(default)]
    billing_unit: String,
    #[serde(default)]
    price_by_quantity: BTreeMap<BillingCadence, String>,
    #[serde(default)]
    billed_annually: Option<String>,
    #[serde(default)]
    billed_month_to_month: Option<String>,
    #[serde(default)]
    on_demand: Option<String>,
    #[serde(default)]
    plan: Option<PlanTier>,
    #[serde(default)]
    category: Option<String>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let mut prices = raw.price_by_quantity;
        let columns = [
            (BillingCadence::BilledAnnually, raw.billed_annually),
            (BillingCadence::BilledMonthToMonth, raw.billed_month_to_month),
            (BillingCadence::OnDemand, raw.on_demand),
        ];
        for (cadence, value) in columns {
            if let Some(value) = value {
                prices.entry(cadence).or_insert(value);
            }
        }

        Product {
            id: raw
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| generate_product_id(&raw.name, &raw.billing_unit)),
            plan: raw
                .plan
                .unwrap_or_else(|| PlanTier::from_product_name(&raw.name)),
            name: raw.name,
            billing_unit: raw.billing_unit,
            price_by_quantity: prices,
            category: raw.category,
        }
    }
}

/// Enable flag and usage count of one add-on.
///
/// Disabling keeps the usage count so toggling back restores it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AddOnToggle {
    pub enabled: bool,
    pub usage_count: f64,
}

impl AddOnToggle {
    pub fn enabled(usage_count: f64) -> Self {
        Self {
            enabled: true,
            usage_count,
        }
    }

    pub fn disabled(usage_count: f64) -> Self {
        Self {
            enabled: false,
            usage_count,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Fixed-shape add-on configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AddOns {
    #[serde(default)]
    pub archive_search: AddOnToggle,
    #[serde(default)]
    pub flex_storage: AddOnToggle,
    #[serde(default)]
    pub forwarding: AddOnToggle,
}

impl AddOns {
    pub fn get(&self, kind: AddOnKind) -> &AddOnToggle {
        match kind {
            AddOnKind::ArchiveSearch => &self.archive_search,
            AddOnKind::FlexStorage => &self.flex_storage,
            AddOnKind::Forwarding => &self.forwarding,
        }
    }

    pub fn get_mut(&mut self, kind: AddOnKind) -> &mut AddOnToggle {
        match kind {
            AddOnKind::ArchiveSearch => &mut self.archive_search,
            AddOnKind::FlexStorage => &mut self.flex_storage,
            AddOnKind::Forwarding => &mut self.forwarding,
        }
    }

    /// Add-ons in configured order
    pub fn iter(&self) -> impl Iterator<Item = (AddOnKind, &AddOnToggle)> {
        AddOnKind::iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Mandatory categories are always enabled
    pub fn is_enabled(&self, category: Category) -> bool {
        category
            .add_on()
            .map(|kind| self.get(kind).enabled)
            .unwrap_or(true)
    }
}

/// Snapshot of user-supplied usage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageInput {
    /// Ingested volume, GB per month
    pub ingested_gb: f64,
    /// Average entry size, KB
    pub avg_entry_kb: f64,
    /// Share of ingested entries that get indexed, 0-100
    pub indexing_percent: f64,
    pub retention: RetentionWindow,
    #[serde(default)]
    pub add_ons: AddOns,
}

impl Default for UsageInput {
    fn default() -> Self {
        Self {
            ingested_gb: DEFAULT_INGESTED_GB,
            avg_entry_kb: DEFAULT_AVG_ENTRY_KB,
            indexing_percent: DEFAULT_INDEXING_PERCENT,
            retention: RetentionWindow::default(),
            add_ons: AddOns::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_window_parsing() {
        assert_eq!("15".parse::<RetentionWindow>().unwrap(), RetentionWindow::Days15);
        assert_eq!("7d".parse::<RetentionWindow>().unwrap(), RetentionWindow::Days7);
        assert_eq!("30-day".parse::<RetentionWindow>().unwrap(), RetentionWindow::Days30);
        assert!("45".parse::<RetentionWindow>().is_err());
        assert!("fortnight".parse::<RetentionWindow>().is_err());
        assert_eq!(RetentionWindow::Days3.token(), "3-day");
    }

    #[test]
    fn test_plan_tier_from_name() {
        assert_eq!(PlanTier::from_product_name("Infrastructure Enterprise"), PlanTier::Enterprise);
        assert_eq!(PlanTier::from_product_name("Infrastructure Pro"), PlanTier::Pro);
        assert_eq!(PlanTier::from_product_name("Ingested Logs"), PlanTier::All);
    }

    #[test]
    fn test_product_id_is_deterministic_and_normalized() {
        let a = generate_product_id("Ingested Logs", "per GB");
        let b = generate_product_id("  ingested logs ", "PER GB");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_ne!(a, generate_product_id("Ingested Logs", "per million"));
    }

    #[test]
    fn test_product_from_scraped_columns() {
        let json = r#"{
            "product": "Indexed Logs (Standard Tier)",
            "billing_unit": "per million log events, per month, 15-day retention",
            "billed_annually": "$1.70",
            "billed_month_to_month": "$2.55",
            "on_demand": null
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.name, "Indexed Logs (Standard Tier)");
        assert_eq!(product.price(BillingCadence::BilledAnnually), Some("$1.70"));
        assert_eq!(product.price(BillingCadence::BilledMonthToMonth), Some("$2.55"));
        assert_eq!(product.price(BillingCadence::OnDemand), None);
        assert_eq!(
            product.id,
            generate_product_id(&product.name, &product.billing_unit)
        );
    }

    #[test]
    fn test_add_on_toggle_keeps_usage_count() {
        let mut add_ons = AddOns::default();
        *add_ons.get_mut(AddOnKind::Forwarding) = AddOnToggle::enabled(40.0);
        add_ons.get_mut(AddOnKind::Forwarding).set_enabled(false);

        assert!(!add_ons.is_enabled(Category::Forwarding));
        assert_eq!(add_ons.forwarding.usage_count, 40.0);
        assert!(add_ons.is_enabled(Category::Ingestion));
    }

    #[test]
    fn test_region_catalog_file_name() {
        assert_eq!(Region::Us1Fed.catalog_file_name(), "pricing-us1-fed.json");
        assert_eq!("eu1".parse::<Region>().unwrap(), Region::Eu1);
    }
}
