//! Billing quantities derived from raw usage inputs.
//!
//! All arithmetic is `f64` with no intermediate rounding. Rounding for
//! display or for quote quantities happens elsewhere.

use serde::Serialize;

use crate::models::{AddOnKind, AddOnToggle, Category, UsageInput};

/// KB in one GB (binary units)
pub const KB_PER_GB: f64 = 1024.0 * 1024.0;
/// Indexed events are billed per million
pub const EVENTS_PER_MILLION: f64 = 1_000_000.0;

/// Quantities each category is billed on, all `>= 0`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DerivedQuantities {
    /// Ingested volume, GB per month
    pub ingested_gb: f64,
    /// Log entries per month
    pub total_entries: f64,
    pub indexed_entries: f64,
    /// Billing quantity of the indexed-logs product
    pub indexed_in_millions: f64,
    pub archive_search: f64,
    pub flex_storage: f64,
    pub forwarding: f64,
}

impl DerivedQuantities {
    /// Evaluate every derived quantity in dependency order
    pub fn compute(input: &UsageInput) -> Self {
        let ingested_gb = non_negative(input.ingested_gb);
        let total_entries = total_entries(ingested_gb, input.avg_entry_kb);
        let indexed_entries = indexed_entries(total_entries, input.indexing_percent);
        let indexed_in_millions = in_millions(indexed_entries);

        Self {
            ingested_gb,
            total_entries,
            indexed_entries,
            indexed_in_millions,
            archive_search: add_on_quantity(input.add_ons.get(AddOnKind::ArchiveSearch)),
            flex_storage: add_on_quantity(input.add_ons.get(AddOnKind::FlexStorage)),
            forwarding: add_on_quantity(input.add_ons.get(AddOnKind::Forwarding)),
        }
    }

    /// Quantity the category's product is billed on
    pub fn for_category(&self, category: Category) -> f64 {
        match category {
            Category::Ingestion => self.ingested_gb,
            Category::IndexedLogs => self.indexed_in_millions,
            Category::ArchiveSearch => self.archive_search,
            Category::FlexStorage => self.flex_storage,
            Category::Forwarding => self.forwarding,
        }
    }
}

/// `ingested_gb * 1024 * 1024 / avg_entry_kb`; zero for non-positive inputs
pub fn total_entries(ingested_gb: f64, avg_entry_kb: f64) -> f64 {
    let ingested_gb = non_negative(ingested_gb);
    let avg_entry_kb = non_negative(avg_entry_kb);
    if avg_entry_kb == 0.0 {
        return 0.0;
    }
    ingested_gb * KB_PER_GB / avg_entry_kb
}

/// Entries made searchable; the percentage is clamped to `0..=100`
pub fn indexed_entries(total_entries: f64, indexing_percent: f64) -> f64 {
    let percent = non_negative(indexing_percent).min(100.0);
    non_negative(total_entries) * (percent / 100.0)
}

pub fn in_millions(events: f64) -> f64 {
    non_negative(events) / EVENTS_PER_MILLION
}

/// A disabled add-on bills nothing, whatever its configured count
pub fn add_on_quantity(toggle: &AddOnToggle) -> f64 {
    if toggle.enabled {
        non_negative(toggle.usage_count)
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
