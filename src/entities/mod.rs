use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored when a field's extraction chain comes up empty.
/// Distinguishes "field absent from the page" from "field empty".
pub const NO_DATA: &str = "no data";

/// One name/value pair from a specification table row.
///
/// `name` has its trailing colon and surrounding whitespace already
/// trimmed; both sides are non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A single price tier of a supplier offer. This catalog always produces
/// exactly one tier: quantity 1, no discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub quantity: u32,
    pub discount: f64,
    pub price: f64,
}

impl PriceEntry {
    pub fn single(price: f64) -> Self {
        Self {
            quantity: 1,
            discount: 0.0,
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierOffer {
    pub prices: Vec<PriceEntry>,
    pub stock: String,
    pub delivery_time: String,
    pub package_info: String,
    pub purchase_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub description: String,
    pub offers: Vec<SupplierOffer>,
}

/// A normalized product record, built fresh on every crawl of a URL and
/// reconciled against the store afterwards. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub article: String,
    pub brand: String,
    pub country_of_origin: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub attributes: Vec<Attribute>,
    pub suppliers: Vec<Supplier>,
}

impl Product {
    /// True when an article/SKU was found on the page. Products without
    /// one are reconciled by title + purchase URL instead.
    pub fn has_article(&self) -> bool {
        self.article != NO_DATA
    }

    /// URL of the first offer of the first supplier, if any. This is the
    /// page the product was scraped from and serves as a secondary
    /// reconciliation key.
    pub fn purchase_url(&self) -> Option<&str> {
        self.suppliers
            .first()
            .and_then(|s| s.offers.first())
            .map(|o| o.purchase_url.as_str())
            .filter(|u| !u.is_empty())
    }
}

/// Normalizes an optional article value: `None`, empty, and
/// whitespace-only all collapse to the sentinel. Applied by the assembler
/// on top of the extractor's own sentinel.
pub fn normalize_article(article: Option<String>) -> String {
    match article {
        Some(a) if !a.trim().is_empty() => a,
        _ => NO_DATA.to_string(),
    }
}
