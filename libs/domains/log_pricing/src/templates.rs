//! Built-in quote templates: ready-made product selections resolved
//! against a catalog by exact product name.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::matcher::{find_product, MatchCriteria};
use crate::models::Region;
use crate::quote::QuoteItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateItem {
    pub product_name: &'static str,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub region: Region,
    pub items: &'static [TemplateItem],
}

const fn item(product_name: &'static str, quantity: u64) -> TemplateItem {
    TemplateItem {
        product_name,
        quantity,
    }
}

static DEFAULT_TEMPLATES: &[QuoteTemplate] = &[
    QuoteTemplate {
        id: "website-fullstack",
        name: "Full Stack Website",
        description: "Complete observability for a web application with frontend, backend, database, and logs",
        region: Region::Us,
        items: &[
            item("APM Hosts", 2),
            item("Infrastructure Hosts", 3),
            item("RUM Sessions", 100_000),
            item("Database Hosts", 1),
            item("Logs Ingested", 10),
            item("Logs Indexed (15-day Retention)", 5),
        ],
    },
    QuoteTemplate {
        id: "iot-infrastructure",
        name: "IoT Project",
        description: "Monitor IoT devices with metrics, logs, and incident management",
        region: Region::Us,
        items: &[
            item("Custom Metrics", 500),
            item("Infrastructure Hosts", 5),
            item("Logs Ingested", 50),
            item("Logs Indexed (3-day Retention)", 10),
            item("Incident Management (Per User)", 5),
            item("On-Call", 5),
        ],
    },
    QuoteTemplate {
        id: "kubernetes-aws",
        name: "Kubernetes on AWS",
        description: "Full K8s cluster monitoring with containers, cloud costs, and log management",
        region: Region::Us,
        items: &[
            item("Infrastructure Hosts", 10),
            item("Containers", 100),
            item("APM Hosts", 5),
            item("Cloud Cost Management", 1),
            item("Logs Ingested", 100),
            item("Logs Indexed (7-day Retention)", 30),
        ],
    },
];

pub fn default_templates() -> &'static [QuoteTemplate] {
    DEFAULT_TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static QuoteTemplate> {
    DEFAULT_TEMPLATES.iter().find(|t| t.id == id)
}

impl QuoteTemplate {
    /// Quote items for the template, in template order. Names the catalog
    /// does not carry are skipped.
    pub fn resolve(&self, catalog: &Catalog) -> Vec<QuoteItem> {
        self.items
            .iter()
            .filter_map(|entry| {
                let criteria = MatchCriteria::exact_name(entry.product_name);
                let Some(product) = find_product(catalog.products(), &criteria) else {
                    tracing::debug!(
                        template = self.id,
                        product = entry.product_name,
                        "Template product not in catalog"
                    );
                    return None;
                };
                QuoteItem::new(product, entry.quantity)
            })
            .collect()
    }
}
