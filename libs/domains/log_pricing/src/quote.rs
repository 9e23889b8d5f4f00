//! Quote items handed to the external quote store.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::LogPricingResult;
use crate::matcher::MatchedProducts;
use crate::models::{AddOns, Category, Product};
use crate::quantities::DerivedQuantities;

/// A product with a positive integer quantity.
///
/// Only constructible for a present product and a quantity `>= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteItem {
    product: Product,
    quantity: u64,
}

impl QuoteItem {
    pub fn new(product: &Product, quantity: u64) -> Option<Self> {
        (quantity >= 1).then(|| Self {
            product: product.clone(),
            quantity,
        })
    }

    /// Quote quantity is the ceiling of the continuous quantity
    /// (7.86 million events quote as 8)
    pub fn from_continuous(product: &Product, quantity: f64) -> Option<Self> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return None;
        }
        Self::new(product, quantity.ceil() as u64)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}

/// Items for every matched, enabled category with a positive quantity, in
/// category precedence. No cross-category deduplication.
pub fn build_items(
    matches: &MatchedProducts<'_>,
    quantities: &DerivedQuantities,
    add_ons: &AddOns,
) -> Vec<QuoteItem> {
    Category::iter()
        .filter(|category| add_ons.is_enabled(*category))
        .filter_map(|category| {
            let product = matches.get(category)?;
            QuoteItem::from_continuous(product, quantities.for_category(category))
        })
        .collect()
}

/// Receiver of finalized quote items (the external quote store)
#[cfg_attr(test, mockall::automock)]
pub trait QuoteSink {
    fn commit(&self, items: Vec<QuoteItem>) -> LogPricingResult<()>;
}

/// Hand items to the sink. An empty selection does not reach the sink.
pub fn commit_items(items: Vec<QuoteItem>, sink: &dyn QuoteSink) -> LogPricingResult<usize> {
    if items.is_empty() {
        tracing::debug!("No quote items to commit");
        return Ok(0);
    }

    let count = items.len();
    sink.commit(items)?;
    tracing::debug!(count, "Committed quote items");
    Ok(count)
}
