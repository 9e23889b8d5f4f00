//! Read-only product catalog and snapshot change detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use strum::IntoEnumIterator;

use crate::error::LogPricingResult;
use crate::models::{BillingCadence, Product, Region};

/// Products in caller-controlled order. Nothing in the pricing core
/// mutates a catalog once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Decode a JSON array of product records
    pub fn from_json(json: &str) -> LogPricingResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        tracing::debug!(products = products.len(), "Loaded catalog");
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Kind of difference between two catalog snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeKind {
    ProductAdded {
        prices: BTreeMap<BillingCadence, String>,
    },
    PriceChange {
        field: BillingCadence,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    ProductRemoved {
        prices: BTreeMap<BillingCadence, String>,
    },
}

/// One detected pricing change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingChange {
    pub timestamp: DateTime<Utc>,
    pub region: Region,
    pub product: String,
    pub product_id: String,
    pub category: Option<String>,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl PricingChange {
    fn new(product: &Product, region: Region, timestamp: DateTime<Utc>, kind: ChangeKind) -> Self {
        Self {
            timestamp,
            region,
            product: product.name.clone(),
            product_id: product.id.clone(),
            category: product.category.clone(),
            kind,
        }
    }
}

/// Compare two snapshots keyed by product id.
///
/// Additions and price changes follow the new catalog's order, removals
/// follow the old one's. Duplicate ids count once (first occurrence).
pub fn diff_catalogs(
    old: &Catalog,
    new: &Catalog,
    region: Region,
    detected_at: DateTime<Utc>,
) -> Vec<PricingChange> {
    let mut old_by_id: HashMap<&str, &Product> = HashMap::new();
    for product in old.products() {
        old_by_id.entry(product.id.as_str()).or_insert(product);
    }

    let mut changes = Vec::new();
    let mut seen_new: HashSet<&str> = HashSet::new();

    for product in new.products() {
        if !seen_new.insert(product.id.as_str()) {
            continue;
        }

        let Some(previous) = old_by_id.get(product.id.as_str()) else {
            changes.push(PricingChange::new(
                product,
                region,
                detected_at,
                ChangeKind::ProductAdded {
                    prices: product.price_by_quantity.clone(),
                },
            ));
            continue;
        };

        for cadence in BillingCadence::iter() {
            let old_value = previous.price(cadence);
            let new_value = product.price(cadence);
            if old_value != new_value {
                changes.push(PricingChange::new(
                    product,
                    region,
                    detected_at,
                    ChangeKind::PriceChange {
                        field: cadence,
                        old_value: old_value.map(str::to_string),
                        new_value: new_value.map(str::to_string),
                    },
                ));
            }
        }
    }

    let mut seen_old: HashSet<&str> = HashSet::new();
    for product in old.products() {
        if seen_new.contains(product.id.as_str()) || !seen_old.insert(product.id.as_str()) {
            continue;
        }
        changes.push(PricingChange::new(
            product,
            region,
            detected_at,
            ChangeKind::ProductRemoved {
                prices: product.price_by_quantity.clone(),
            },
        ));
    }

    if !changes.is_empty() {
        tracing::debug!(region = %region, changes = changes.len(), "Detected pricing changes");
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogPricingError;

    fn ingestion(price: &str) -> Product {
        Product::new("Ingested Logs", "per GB").with_price(BillingCadence::BilledAnnually, price)
    }

    #[test]
    fn test_from_json_rejects_malformed_payload() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LogPricingError::Catalog(_)));
    }

    #[test]
    fn test_from_json_keeps_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"product": "Ingested Logs", "billing_unit": "per GB", "billed_annually": "$0.10"},
                {"name": "Flex Logs Storage", "billing_unit": "per million events",
                 "price_by_quantity": {"on_demand": "$0.05"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[1].name, "Flex Logs Storage");
        assert_eq!(catalog.products()[1].price(BillingCadence::OnDemand), Some("$0.05"));
        let id = catalog.products()[0].id.clone();
        assert_eq!(catalog.find_by_id(&id).unwrap().name, "Ingested Logs");
    }

    #[test]
    fn test_diff_detects_price_change() {
        let old = Catalog::from_products(vec![ingestion("$0.10")]);
        let new = Catalog::from_products(vec![ingestion("$0.12")]);

        let changes = diff_catalogs(&old, &new, Region::Us, Utc::now());

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].kind,
            ChangeKind::PriceChange {
                field: BillingCadence::BilledAnnually,
                old_value: Some("$0.10".to_string()),
                new_value: Some("$0.12".to_string()),
            }
        );
    }

    #[test]
    fn test_diff_detects_added_and_removed() {
        let forwarding = Product::new("Log Forwarding to Custom Destinations", "per GB");
        let archive = Product::new("Log Archive Search", "per GB scanned");
        let old = Catalog::from_products(vec![ingestion("$0.10"), archive.clone()]);
        let new = Catalog::from_products(vec![ingestion("$0.10"), forwarding.clone()]);

        let changes = diff_catalogs(&old, &new, Region::Eu1, Utc::now());

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].product_id, forwarding.id);
        assert!(matches!(changes[0].kind, ChangeKind::ProductAdded { .. }));
        assert_eq!(changes[1].product_id, archive.id);
        assert!(matches!(changes[1].kind, ChangeKind::ProductRemoved { .. }));
        assert!(changes.iter().all(|c| c.region == Region::Eu1));
    }

    #[test]
    fn test_diff_identical_catalogs_is_empty() {
        let catalog = Catalog::from_products(vec![ingestion("$0.10")]);
        assert!(diff_catalogs(&catalog, &catalog, Region::Us, Utc::now()).is_empty());
    }

    #[test]
    fn test_change_serializes_with_type_tag() {
        let old = Catalog::default();
        let new = Catalog::from_products(vec![ingestion("$0.10")]);
        let changes = diff_catalogs(&old, &new, Region::Us, Utc::now());

        let json = serde_json::to_value(&changes[0]).unwrap();
        assert_eq!(json["type"], "product_added");
        assert_eq!(json["region"], "us");
        assert_eq!(json["prices"]["billed_annually"], "$0.10");
    }
}
