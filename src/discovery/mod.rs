//! Catalog discovery: category links from the start page, pagination
//! expansion, and product links from listing pages.
//!
//! These are pure functions over fetched markup; the crawl driver owns
//! the fetching.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use tracing::{debug, info};
use url::Url;

use crate::extractor::document::{Document, attr_of, find_in};

static CATEGORY_CARD_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.category-card__name").unwrap());
static PRODUCT_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.product-card").unwrap());
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

static PAGE_PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"page=(\d+)").unwrap());

/// Relative prefix of product detail links inside listing cards.
const PRODUCT_PATH_PREFIX: &str = "products/";

/// Category links from the start page: anchors inside category-card name
/// blocks, resolved against the base URL.
pub fn category_links(markup: &str, base_url: &Url) -> Vec<Url> {
    let doc = Document::parse(markup);
    let mut categories = Vec::new();

    for card in doc.find_all(&CATEGORY_CARD_NAME) {
        if let Some(href) = find_in(card, &A).and_then(|link| attr_of(link, "href"))
            && let Ok(full_url) = base_url.join(href)
        {
            debug!(category = %full_url, "discovered category");
            categories.push(full_url);
        }
    }

    info!(count = categories.len(), "categories discovered");
    categories
}

/// Number of listing pages in a category: the highest `page=N` query value
/// anywhere in the markup, or 1 when the category has no pagination.
pub fn page_count(markup: &str) -> u32 {
    let max_page = PAGE_PARAM_REGEX
        .captures_iter(markup)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max();

    match max_page {
        Some(count) => {
            info!(count, "pagination resolved");
            count
        }
        None => {
            info!("no pagination found, assuming a single page");
            1
        }
    }
}

/// Expands a category URL into its listing page URLs: the category page
/// itself, then `?page=2` through `?page=count`.
pub fn page_links(category_url: &Url, count: u32) -> Vec<Url> {
    let mut pages = Vec::with_capacity(count as usize);
    for page_number in 1..=count {
        if page_number == 1 {
            pages.push(category_url.clone());
        } else {
            let mut page = category_url.clone();
            page.set_query(Some(&format!("page={page_number}")));
            pages.push(page);
        }
    }
    debug!(count = pages.len(), "page links created");
    pages
}

/// Product links on one listing page: anchors inside product cards whose
/// href starts with the product path prefix, resolved absolute,
/// deduplicated, sorted.
pub fn product_links(markup: &str, base_url: &Url) -> Vec<Url> {
    let doc = Document::parse(markup);
    let mut links: BTreeSet<Url> = BTreeSet::new();

    let mut card_count = 0usize;
    for card in doc.find_all(&PRODUCT_CARD) {
        card_count += 1;
        for link in card.select(&A) {
            let Some(href) = attr_of(link, "href") else {
                continue;
            };
            if href.starts_with(PRODUCT_PATH_PREFIX)
                && let Ok(full_url) = base_url.join(href)
            {
                links.insert(full_url);
            }
        }
    }

    debug!(cards = card_count, "product cards scanned");
    info!(count = links.len(), "product links discovered");
    links.into_iter().collect()
}
