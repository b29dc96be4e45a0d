//! Per-field extractors over a parsed product page.
//!
//! Every extractor is total: it walks a fixed fallback chain of candidate
//! locations, takes the first one that yields non-empty trimmed text, and
//! lands on a sentinel when the chain is exhausted. The chain order is a
//! confidence ranking — structural markup first, catch-all metadata last —
//! and must not be reordered.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use crate::entities::NO_DATA;
use crate::extractor::document::{Document, attr_of, find_in, has_class, text_of};

/// Exact label of the origin-country row in the specification table.
const COUNTRY_LABEL: &str = "Country of origin:";
/// Root breadcrumb label, never a category.
const ROOT_BREADCRUMB: &str = "Home";

macro_rules! selectors {
    ($($name:ident => $sel:literal;)*) => {
        $(static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($sel).unwrap());)*
    };
}

selectors! {
    H1 => "h1";
    ACTIVE_BREADCRUMB => "li.breadcrumb-item.active";
    META_NAME => "meta[itemprop=name]";
    DESC_TAB => "#tab-description";
    DESC_BLOCK => "div.product__description";
    P => "p";
    SPAN => "span";
    A => "a";
    VARIANT_SKU => "span.variant-sku";
    SKU_ITEM => "li.sku.sku-show";
    META_SKU => "meta[itemprop=sku]";
    PRODUCT_META => "ul.product__meta";
    BRAND_CONTAINER => "div[itemprop=brand]";
    META_BRAND => "meta[itemprop=brand]";
    SPEC_BLOCK => "div.spec";
    SPEC_SECTION => "div.spec__section";
    SPEC_ROW => "div.spec__row";
    SPEC_NAME => "div.spec__name";
    SPEC_VALUE => "div.spec__value";
    BREADCRUMB => "ol.breadcrumb";
    BREADCRUMB_ITEM => "li.breadcrumb-item";
    META_CATEGORY => "meta[itemprop=category]";
    PRICES_BLOCK => "div.product__prices";
    NEW_PRICE => "span.new-price";
    OLD_PRICE => "span.old-price";
    CHECKED_VARIANT => "input.variant-radio.checked";
    ANY_CHECKED_INPUT => "input[checked]";
    META_PRICE => "meta[itemprop=price]";
    STOCK_SUCCESS => "span.text-success";
    AVAILABILITY_ITEM => "li.product__meta-availability";
}

/// Digit groups of up to three separated by spaces, with an optional
/// two-decimal fraction using comma or dot: `1 234,56`, `999`, `12.00`.
static PRICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:\s\d{3})*(?:[,.]\d{2})?)").unwrap());

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Title: primary heading, then the active breadcrumb (the product's own
/// crumb), then the itemprop name.
pub fn extract_title(doc: &Document) -> String {
    doc.find(&H1)
        .and_then(|h1| non_empty(text_of(h1)))
        .or_else(|| {
            doc.find(&ACTIVE_BREADCRUMB)
                .and_then(|item| non_empty(text_of(item)))
        })
        .or_else(|| {
            doc.find(&META_NAME)
                .and_then(|meta| attr_of(meta, "content"))
                .and_then(|content| non_empty(content.to_string()))
        })
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Description: first paragraph of the description tab, then the
/// description block's full text, then its first paragraph, then its
/// first inline span. Each step runs only when the prior yielded nothing.
pub fn extract_description(doc: &Document) -> String {
    if let Some(tab) = doc.find(&DESC_TAB)
        && let Some(p) = find_in(tab, &P)
        && let Some(description) = non_empty(text_of(p))
    {
        return description;
    }

    if let Some(block) = doc.find(&DESC_BLOCK) {
        if let Some(description) = non_empty(text_of(block)) {
            return description;
        }
        if let Some(p) = find_in(block, &P)
            && let Some(description) = non_empty(text_of(p))
        {
            return description;
        }
        if let Some(span) = find_in(block, &SPAN)
            && let Some(description) = non_empty(text_of(span))
        {
            return description;
        }
    }

    NO_DATA.to_string()
}

/// Article/SKU: variant SKU label, then the SKU list item's nested span,
/// then the itemprop. The assembler re-normalizes empty to the sentinel
/// on top of this.
pub fn extract_article(doc: &Document) -> String {
    doc.find(&VARIANT_SKU)
        .and_then(|span| non_empty(text_of(span)))
        .or_else(|| {
            doc.find(&SKU_ITEM)
                .and_then(|item| find_in(item, &SPAN))
                .and_then(|span| non_empty(text_of(span)))
        })
        .or_else(|| {
            doc.find(&META_SKU)
                .and_then(|meta| attr_of(meta, "content"))
                .and_then(|content| non_empty(content.trim().to_string()))
        })
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Brand: first link in the product meta list, then the brand container's
/// nested itemprop content.
pub fn extract_brand(doc: &Document) -> String {
    doc.find(&PRODUCT_META)
        .and_then(|list| find_in(list, &A))
        .and_then(|link| non_empty(text_of(link)))
        .or_else(|| {
            doc.find(&BRAND_CONTAINER)
                .and_then(|container| find_in(container, &META_BRAND))
                .and_then(|meta| attr_of(meta, "content"))
                .and_then(|content| non_empty(content.to_string()))
        })
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Country of origin: scan the first spec section's rows for the exact
/// origin label and return the paired value cell.
pub fn extract_country(doc: &Document) -> String {
    if let Some(block) = doc.find(&SPEC_BLOCK)
        && let Some(section) = find_in(block, &SPEC_SECTION)
    {
        for row in section.select(&SPEC_ROW) {
            let (Some(name_cell), Some(value_cell)) =
                (find_in(row, &SPEC_NAME), find_in(row, &SPEC_VALUE))
            else {
                continue;
            };
            if text_of(name_cell) == COUNTRY_LABEL {
                return text_of(value_cell);
            }
        }
    }

    NO_DATA.to_string()
}

/// Category: deepest non-active breadcrumb (excluding the root label),
/// else the last segment of the slash-delimited itemprop category chain.
pub fn extract_category(doc: &Document) -> String {
    if let Some(breadcrumb) = doc.find(&BREADCRUMB) {
        let mut categories = Vec::new();
        for item in breadcrumb.select(&BREADCRUMB_ITEM) {
            if has_class(item, "active") {
                continue;
            }
            if let Some(link) = find_in(item, &A) {
                let category = text_of(link);
                if !category.is_empty() && category != ROOT_BREADCRUMB {
                    categories.push(category);
                }
            }
        }
        // The last crumb before the product itself is the most specific.
        if let Some(category) = categories.pop() {
            return category;
        }
    }

    if let Some(content) = doc.find(&META_CATEGORY).and_then(|meta| attr_of(meta, "content"))
        && let Some(last) = content.split('/').next_back().map(str::trim)
        && !last.is_empty()
    {
        return last.to_string();
    }

    NO_DATA.to_string()
}

/// Price: discounted price span, then the original price span (only when
/// it parses to a positive value), then the checked variant's data
/// attribute, then the itemprop. Candidates that fail to parse fall
/// through. The final fallback is an explicit numeric zero, not the
/// textual sentinel the other fields use.
pub fn extract_price(doc: &Document) -> f64 {
    if let Some(block) = doc.find(&PRICES_BLOCK) {
        if let Some(price) = find_in(block, &NEW_PRICE).and_then(|span| parse_price(&text_of(span)))
        {
            return price;
        }
        if let Some(price) = find_in(block, &OLD_PRICE)
            .and_then(|span| parse_price(&text_of(span)))
            .filter(|p| *p > 0.0)
        {
            return price;
        }
    }

    let checked_variant = doc
        .find(&CHECKED_VARIANT)
        .or_else(|| doc.find(&ANY_CHECKED_INPUT));
    if let Some(price) = checked_variant
        .and_then(|input| attr_of(input, "data-price"))
        .and_then(parse_price)
    {
        return price;
    }

    if let Some(price) = doc
        .find(&META_PRICE)
        .and_then(|meta| attr_of(meta, "content"))
        .and_then(parse_price)
    {
        return price;
    }

    0.0
}

/// Parses the first price-shaped number in `text`: spaces stripped,
/// decimal comma mapped to a dot. `None` means "no match here, try the
/// next candidate".
pub fn parse_price(text: &str) -> Option<f64> {
    let matched = PRICE_REGEX.captures(text)?.get(1)?.as_str();
    let normalized: String = matched
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse().ok()
}

/// Stock: success-styled span in the product meta list, then the
/// availability list item's nested span.
pub fn extract_stock(doc: &Document) -> String {
    let Some(list) = doc.find(&PRODUCT_META) else {
        return NO_DATA.to_string();
    };

    find_in(list, &STOCK_SUCCESS)
        .and_then(|span| non_empty(text_of(span)))
        .or_else(|| {
            find_in(list, &AVAILABILITY_ITEM)
                .and_then(|item| find_in(item, &SPAN))
                .and_then(|span| non_empty(text_of(span)))
        })
        .unwrap_or_else(|| NO_DATA.to_string())
}
