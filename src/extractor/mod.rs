//! Product-page extraction: parsed document in, normalized record out.
//!
//! All extractors are pure functions over the same immutable tree. A gap
//! in any one field degrades to that field's sentinel; assembly itself
//! never fails once a page has been fetched.

pub mod attributes;
pub mod document;
pub mod fields;

#[cfg(test)]
mod tests;

use chrono::Utc;
use tracing::instrument;
use url::Url;

use crate::entities::{PriceEntry, Product, Supplier, SupplierOffer, NO_DATA, normalize_article};
use crate::extractor::document::Document;
use crate::fetcher::PageResponse;

/// The one vendor behind this catalog. Facts about the source site, not
/// deployment configuration.
const SUPPLIER_NAME: &str = "OptoStroy";
const SUPPLIER_PHONE: &str = "8 (499) 455-50-75; 8 (800) 500-61-72";
const SUPPLIER_ADDRESS: &str = "Moscow, 41km Construction Market";
const SUPPLIER_DESCRIPTION: &str = "Wholesale and retail building materials store";

/// Builds a product record from a fetched page. The record is complete by
/// construction: fields the page lacks carry sentinels instead of being
/// absent.
#[instrument(skip_all, fields(url = %page.url_final))]
pub fn parse_product(page: &PageResponse) -> Product {
    let doc = Document::parse(&page.body_utf8);
    assemble(&doc, &page.url_final)
}

fn assemble(doc: &Document, page_url: &Url) -> Product {
    let article = normalize_article(Some(fields::extract_article(doc)));

    Product {
        title: fields::extract_title(doc),
        description: fields::extract_description(doc),
        article,
        brand: fields::extract_brand(doc),
        country_of_origin: fields::extract_country(doc),
        category: fields::extract_category(doc),
        created_at: Utc::now(),
        attributes: attributes::extract_attributes(doc),
        suppliers: vec![supplier_for(doc, page_url)],
    }
}

/// The single static supplier identity with one offer: a one-tier price
/// list, the extracted stock line, and the page URL as purchase URL.
fn supplier_for(doc: &Document, page_url: &Url) -> Supplier {
    let offer = SupplierOffer {
        prices: vec![PriceEntry::single(fields::extract_price(doc))],
        stock: fields::extract_stock(doc),
        delivery_time: NO_DATA.to_string(),
        package_info: NO_DATA.to_string(),
        purchase_url: page_url.to_string(),
    };

    Supplier {
        name: SUPPLIER_NAME.to_string(),
        phone: SUPPLIER_PHONE.to_string(),
        address: SUPPLIER_ADDRESS.to_string(),
        description: SUPPLIER_DESCRIPTION.to_string(),
        offers: vec![offer],
    }
}

#[cfg(test)]
pub(crate) fn parse_product_markup(markup: &str, page_url: &str) -> Product {
    let doc = Document::parse(markup);
    let url = Url::parse(page_url).expect("test URL must be absolute");
    assemble(&doc, &url)
}
