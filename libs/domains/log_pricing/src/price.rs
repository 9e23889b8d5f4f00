//! Numeric extraction from free-text catalog prices.
//!
//! Catalog prices are scraped text with inconsistent formatting (`"$1.70"`,
//! `"$0.10 per GB"`, `"-"`, `"15%"`). Parsing never fails: any anomaly
//! yields `0.0` so a single broken price cannot block the estimate.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use strum::IntoEnumIterator;

use crate::matcher::MatchedProducts;
use crate::models::{BillingCadence, Category};

/// Unit price per category, `0.0` where nothing matched
pub type UnitPrices = BTreeMap<Category, f64>;

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").unwrap());

const PLACEHOLDERS: &[&str] = &["", "-"];

/// First number in the text, or `0.0`.
///
/// Currency symbols, thousands separators, unit suffixes and surrounding
/// words are ignored.
pub fn parse_unit_price(text: Option<&str>) -> f64 {
    let Some(text) = text.map(str::trim) else {
        return 0.0;
    };
    if PLACEHOLDERS.contains(&text) {
        return 0.0;
    }

    let cleaned = text.replace(',', "");
    PRICE_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Like [`parse_unit_price`], but only for text carrying a `%` marker
pub fn parse_percentage(text: Option<&str>) -> f64 {
    match text {
        Some(t) if t.contains('%') => parse_unit_price(Some(t)),
        _ => 0.0,
    }
}

/// Unit prices of the matched products, read from one price column
pub fn unit_prices(matches: &MatchedProducts<'_>, cadence: BillingCadence) -> UnitPrices {
    Category::iter()
        .map(|category| {
            let price = matches
                .get(category)
                .map(|product| parse_unit_price(product.price(cadence)))
                .unwrap_or(0.0);
            (category, price)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_price_currency() {
        assert_eq!(parse_unit_price(Some("$1.70")), 1.70);
        assert_eq!(parse_unit_price(Some("$0.10 per ingested GB")), 0.10);
        assert_eq!(parse_unit_price(Some("$15")), 15.0);
    }

    #[test]
    fn test_parse_unit_price_placeholders() {
        assert_eq!(parse_unit_price(Some("-")), 0.0);
        assert_eq!(parse_unit_price(Some("")), 0.0);
        assert_eq!(parse_unit_price(Some("  -  ")), 0.0);
        assert_eq!(parse_unit_price(None), 0.0);
    }

    #[test]
    fn test_parse_unit_price_takes_first_number_only() {
        assert_eq!(parse_unit_price(Some("$2.50 per 1M events")), 2.50);
        assert_eq!(parse_unit_price(Some("Starting at $1,200.50 / month")), 1200.50);
        assert_eq!(parse_unit_price(Some("$.75")), 0.75);
    }

    #[test]
    fn test_parse_unit_price_without_digits() {
        assert_eq!(parse_unit_price(Some("Contact sales")), 0.0);
        assert_eq!(parse_unit_price(Some("$")), 0.0);
    }

    #[test]
    fn test_parse_percentage_requires_marker() {
        assert_eq!(parse_percentage(Some("15%")), 15.0);
        assert_eq!(parse_percentage(Some("12.5 % of usage")), 12.5);
        assert_eq!(parse_percentage(Some("15")), 0.0);
        assert_eq!(parse_percentage(Some("-")), 0.0);
        assert_eq!(parse_percentage(None), 0.0);
    }
}
