//! Catalog product matching.
//!
//! The catalog is scanned in caller order and the first record satisfying
//! every active predicate wins. Ties are not an error.

use serde::Serialize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::models::{AddOnKind, Category, Product, RetentionWindow};

/// Predicates a product must satisfy to be selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    /// Case-insensitive substrings that must all appear in the name
    name_contains: Vec<String>,
    /// Case-insensitive substring of the billing unit
    billing_unit_contains: Option<String>,
    /// Exact product name, for single-SKU add-ons
    exact_name: Option<String>,
}

impl MatchCriteria {
    pub fn name_contains<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name_contains: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            ..Default::default()
        }
    }

    pub fn exact_name(name: impl Into<String>) -> Self {
        Self {
            exact_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_billing_unit(mut self, fragment: impl AsRef<str>) -> Self {
        self.billing_unit_contains = Some(fragment.as_ref().to_lowercase());
        self
    }

    /// Raw log volume, billed per GB
    pub fn ingestion() -> Self {
        Self::name_contains(["log", "ingest"])
    }

    /// Indexed events for one retention variant
    pub fn indexed_logs(retention: RetentionWindow) -> Self {
        Self::name_contains(["log", "index"]).with_billing_unit(retention.token())
    }

    pub fn add_on(kind: AddOnKind) -> Self {
        Self::exact_name(kind.catalog_name())
    }

    pub fn for_category(category: Category, retention: RetentionWindow) -> Self {
        match category {
            Category::Ingestion => Self::ingestion(),
            Category::IndexedLogs => Self::indexed_logs(retention),
            other => match other.add_on() {
                Some(kind) => Self::add_on(kind),
                None => Self::default(),
            },
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(exact) = &self.exact_name {
            if product.name != *exact {
                return false;
            }
        }

        if !self.name_contains.is_empty() {
            let name = product.name.to_lowercase();
            if !self.name_contains.iter().all(|term| name.contains(term)) {
                return false;
            }
        }

        match &self.billing_unit_contains {
            Some(fragment) => product.billing_unit.to_lowercase().contains(fragment),
            None => true,
        }
    }
}

/// First product satisfying the criteria, in catalog order
pub fn find_product<'a>(catalog: &'a [Product], criteria: &MatchCriteria) -> Option<&'a Product> {
    catalog.iter().find(|product| criteria.matches(product))
}

/// Matched product per category; absence means the catalog has no record
/// for this configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchedProducts<'a> {
    by_category: BTreeMap<Category, &'a Product>,
}

impl<'a> MatchedProducts<'a> {
    pub fn get(&self, category: Category) -> Option<&'a Product> {
        self.by_category.get(&category).copied()
    }

    pub fn found(&self, category: Category) -> bool {
        self.by_category.contains_key(&category)
    }

    pub fn insert(&mut self, category: Category, product: &'a Product) {
        self.by_category.insert(category, product);
    }

    /// Matched products in category precedence
    pub fn iter(&self) -> impl Iterator<Item = (Category, &'a Product)> + '_ {
        self.by_category.iter().map(|(c, p)| (*c, *p))
    }
}

/// Match every category against the catalog
pub fn match_all(catalog: &[Product], retention: RetentionWindow) -> MatchedProducts<'_> {
    let mut matches = MatchedProducts::default();
    for category in Category::iter() {
        let criteria = MatchCriteria::for_category(category, retention);
        if let Some(product) = find_product(catalog, &criteria) {
            matches.insert(category, product);
        }
    }
    matches
}
