//! Cost aggregation: quantity x unit price per category, summed into a
//! monthly total and its annualized figure.

use serde::Serialize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::models::{AddOns, Category};
use crate::price::UnitPrices;
use crate::quantities::DerivedQuantities;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Monthly cost per category plus totals
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub per_category: BTreeMap<Category, f64>,
    pub total: f64,
    pub annualized: f64,
}

impl CostBreakdown {
    pub fn category(&self, category: Category) -> f64 {
        self.per_category.get(&category).copied().unwrap_or(0.0)
    }
}

/// Every category appears in the breakdown. A missing unit price counts
/// as `0.0`; a disabled add-on contributes exactly `0.0`.
pub fn compute_costs(
    quantities: &DerivedQuantities,
    unit_prices: &UnitPrices,
    add_ons: &AddOns,
) -> CostBreakdown {
    let per_category: BTreeMap<Category, f64> = Category::iter()
        .map(|category| {
            let cost = if add_ons.is_enabled(category) {
                let unit_price = unit_prices.get(&category).copied().unwrap_or(0.0);
                quantities.for_category(category) * unit_price
            } else {
                0.0
            };
            (category, cost)
        })
        .collect();

    let total: f64 = per_category.values().sum();

    CostBreakdown {
        per_category,
        total,
        annualized: total * MONTHS_PER_YEAR,
    }
}
