//! Quote sink that writes committed selections as JSON

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use domain_log_pricing::{
    BillingCadence, LogPricingError, LogPricingResult, QuoteItem, QuoteSink, Region,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct QuoteLine<'a> {
    product_id: &'a str,
    product: &'a str,
    billing_unit: &'a str,
    unit_price: Option<&'a str>,
    quantity: u64,
}

#[derive(Debug, Serialize)]
struct QuoteDocument<'a> {
    created_at: DateTime<Utc>,
    region: Region,
    cadence: BillingCadence,
    items: Vec<QuoteLine<'a>>,
}

/// Writes each committed selection as one JSON document
pub struct JsonQuoteSink {
    output: Option<PathBuf>,
    region: Region,
    cadence: BillingCadence,
    pretty: bool,
}

impl JsonQuoteSink {
    pub fn new(
        output: Option<PathBuf>,
        region: Region,
        cadence: BillingCadence,
        pretty: bool,
    ) -> Self {
        Self {
            output,
            region,
            cadence,
            pretty,
        }
    }

    fn render(&self, items: &[QuoteItem]) -> LogPricingResult<String> {
        let document = QuoteDocument {
            created_at: Utc::now(),
            region: self.region,
            cadence: self.cadence,
            items: items
                .iter()
                .map(|item| QuoteLine {
                    product_id: &item.product().id,
                    product: &item.product().name,
                    billing_unit: &item.product().billing_unit,
                    unit_price: item.product().price(self.cadence),
                    quantity: item.quantity(),
                })
                .collect(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.map_err(|e| LogPricingError::QuoteCommit(e.to_string()))
    }
}

impl QuoteSink for JsonQuoteSink {
    fn commit(&self, items: Vec<QuoteItem>) -> LogPricingResult<()> {
        let body = self.render(&items)?;

        let write_result = match &self.output {
            Some(path) => File::create(path).and_then(|mut file| writeln!(file, "{}", body)),
            None => writeln!(io::stdout().lock(), "{}", body),
        };
        write_result.map_err(|e| LogPricingError::QuoteCommit(e.to_string()))?;

        info!(
            items = items.len(),
            output = ?self.output,
            "Quote committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_log_pricing::Product;

    fn items() -> Vec<QuoteItem> {
        let product = Product::new("Ingested Logs", "per ingested or scanned GB, per month")
            .with_price(BillingCadence::BilledAnnually, "$0.10");
        vec![QuoteItem::new(&product, 100).unwrap()]
    }

    #[test]
    fn test_render_includes_quantities_and_prices() {
        let sink = JsonQuoteSink::new(None, Region::Eu1, BillingCadence::BilledAnnually, false);
        let body = sink.render(&items()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["region"], "eu1");
        assert_eq!(value["cadence"], "billed_annually");
        assert_eq!(value["items"][0]["product"], "Ingested Logs");
        assert_eq!(value["items"][0]["quantity"], 100);
        assert_eq!(value["items"][0]["unit_price"], "$0.10");
    }

    #[test]
    fn test_commit_writes_file() {
        let path = std::env::temp_dir()
            .join(format!("log-estimator-quote-{}.json", std::process::id()));
        let sink = JsonQuoteSink::new(
            Some(path.clone()),
            Region::Us,
            BillingCadence::OnDemand,
            true,
        );

        sink.commit(items()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(written.contains("\"quantity\": 100"));
        // No on-demand column on the fixture
        assert!(written.contains("\"unit_price\": null"));
    }

    #[test]
    fn test_unwritable_output_maps_to_commit_error() {
        let path = std::env::temp_dir()
            .join("log-estimator-missing-dir")
            .join("nested")
            .join("quote.json");
        let sink = JsonQuoteSink::new(Some(path), Region::Us, BillingCadence::OnDemand, true);

        let err = sink.commit(items()).unwrap_err();
        assert!(matches!(err, LogPricingError::QuoteCommit(_)));
    }
}
