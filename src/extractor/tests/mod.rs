use std::fs;

use crate::entities::NO_DATA;
use crate::extractor::document::Document;
use crate::extractor::{attributes, fields, parse_product_markup};

fn doc(markup: &str) -> Document {
    Document::parse(markup)
}

// --- full page ---

#[test]
fn full_product_page_assembles_every_field() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/product.html")
        .expect("Failed to read test fixture");
    let url = "https://optostroy.com/products/drill-x2";

    let product = parse_product_markup(&html, url);

    assert_eq!(product.title, "Drill X2");
    assert_eq!(
        product.description,
        "A compact two-speed drill for everyday site work."
    );
    assert_eq!(product.article, "A100");
    assert_eq!(product.brand, "Makita");
    assert_eq!(product.country_of_origin, "Japan");
    assert_eq!(product.category, "Drills");

    // Brand/country rows are first-class fields, never attributes; the
    // lowercased "weight" repeat is dropped.
    let names: Vec<&str> = product.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Weight", "Chuck type"]);
    assert_eq!(product.attributes[1].value, "Keyless");

    assert_eq!(product.suppliers.len(), 1);
    let supplier = &product.suppliers[0];
    assert_eq!(supplier.name, "OptoStroy");
    let offer = &supplier.offers[0];
    assert_eq!(offer.purchase_url, url);
    assert_eq!(offer.stock, "In stock");
    assert_eq!(offer.prices.len(), 1);
    assert_eq!(offer.prices[0].quantity, 1);
    assert_eq!(offer.prices[0].discount, 0.0);
    assert_eq!(offer.prices[0].price, 12499.90);
}

// --- title chain ---

#[test]
fn title_prefers_the_heading() {
    let d = doc("<h1>Heading title</h1><li class=\"breadcrumb-item active\">Crumb</li>");
    assert_eq!(fields::extract_title(&d), "Heading title");
}

#[test]
fn title_falls_back_to_active_breadcrumb() {
    let d = doc("<ol><li class=\"breadcrumb-item active\">Crumb title</li></ol>");
    assert_eq!(fields::extract_title(&d), "Crumb title");
}

#[test]
fn title_falls_back_to_meta_name() {
    let d = doc("<head><meta itemprop=\"name\" content=\"Meta title\"></head>");
    assert_eq!(fields::extract_title(&d), "Meta title");
}

#[test]
fn title_sentinel_when_nothing_matches() {
    let d = doc("<div>nothing here</div>");
    assert_eq!(fields::extract_title(&d), NO_DATA);
}

#[test]
fn empty_heading_does_not_stop_the_chain() {
    let d = doc("<h1>   </h1><li class=\"breadcrumb-item active\">Crumb title</li>");
    assert_eq!(fields::extract_title(&d), "Crumb title");
}

// --- description chain ---

#[test]
fn description_prefers_the_tab_paragraph() {
    let d = doc(concat!(
        "<div id=\"tab-description\"><p>From the tab.</p></div>",
        "<div class=\"product__description\">From the block.</div>",
    ));
    assert_eq!(fields::extract_description(&d), "From the tab.");
}

#[test]
fn description_empty_tab_paragraph_advances_to_the_block() {
    let d = doc(concat!(
        "<div id=\"tab-description\"><p>  </p></div>",
        "<div class=\"product__description\">From the block.</div>",
    ));
    assert_eq!(fields::extract_description(&d), "From the block.");
}

#[test]
fn description_sentinel_when_nothing_matches() {
    let d = doc("<div id=\"tab-description\"></div>");
    assert_eq!(fields::extract_description(&d), NO_DATA);
}

// --- article chain ---

#[test]
fn article_prefers_the_variant_sku() {
    let d = doc(concat!(
        "<span class=\"variant-sku\">VAR-1</span>",
        "<li class=\"sku sku-show\"><span>LI-2</span></li>",
    ));
    assert_eq!(fields::extract_article(&d), "VAR-1");
}

#[test]
fn article_falls_back_to_the_sku_list_item() {
    let d = doc("<li class=\"sku sku-show\">Article: <span>LI-2</span></li>");
    assert_eq!(fields::extract_article(&d), "LI-2");
}

#[test]
fn article_falls_back_to_meta_sku() {
    let d = doc("<head><meta itemprop=\"sku\" content=\" META-3 \"></head>");
    assert_eq!(fields::extract_article(&d), "META-3");
}

#[test]
fn article_sentinel_when_nothing_matches() {
    assert_eq!(fields::extract_article(&doc("<p>no sku</p>")), NO_DATA);
}

// --- brand chain ---

#[test]
fn brand_prefers_the_meta_list_link() {
    let d = doc(concat!(
        "<ul class=\"product__meta\"><li><a href=\"/b\">Makita</a></li></ul>",
        "<div itemprop=\"brand\"><meta itemprop=\"brand\" content=\"Bosch\"></div>",
    ));
    assert_eq!(fields::extract_brand(&d), "Makita");
}

#[test]
fn brand_falls_back_to_the_brand_container() {
    let d = doc("<div itemprop=\"brand\"><meta itemprop=\"brand\" content=\"Bosch\"></div>");
    assert_eq!(fields::extract_brand(&d), "Bosch");
}

#[test]
fn brand_sentinel_when_nothing_matches() {
    assert_eq!(fields::extract_brand(&doc("<p>nope</p>")), NO_DATA);
}

// --- country chain ---

#[test]
fn country_matches_the_exact_row_label() {
    let d = doc(concat!(
        "<div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Made for:</div><div class=\"spec__value\">Export</div>",
        "</div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Country of origin:</div><div class=\"spec__value\">Japan</div>",
        "</div>",
        "</div></div>",
    ));
    assert_eq!(fields::extract_country(&d), "Japan");
}

#[test]
fn country_sentinel_without_a_matching_row() {
    let d = doc(concat!(
        "<div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Weight:</div><div class=\"spec__value\">2 kg</div>",
        "</div>",
        "</div></div>",
    ));
    assert_eq!(fields::extract_country(&d), NO_DATA);
}

// --- category chain ---

#[test]
fn category_is_the_deepest_non_active_breadcrumb() {
    let d = doc(concat!(
        "<ol class=\"breadcrumb\">",
        "<li class=\"breadcrumb-item\"><a href=\"/\">Home</a></li>",
        "<li class=\"breadcrumb-item\"><a href=\"/t\">Tools</a></li>",
        "<li class=\"breadcrumb-item active\"><a href=\"/d\">Drills</a></li>",
        "</ol>",
    ));
    assert_eq!(fields::extract_category(&d), "Tools");
}

#[test]
fn category_falls_back_to_the_meta_chain_tail() {
    let d = doc("<head><meta itemprop=\"category\" content=\"Catalog/Tools/Drills\"></head>");
    assert_eq!(fields::extract_category(&d), "Drills");
}

#[test]
fn category_sentinel_when_only_the_root_crumb_exists() {
    let d = doc(concat!(
        "<ol class=\"breadcrumb\">",
        "<li class=\"breadcrumb-item\"><a href=\"/\">Home</a></li>",
        "</ol>",
    ));
    assert_eq!(fields::extract_category(&d), NO_DATA);
}

// --- price chain ---

#[test]
fn price_parses_grouped_digits_with_decimal_comma() {
    assert_eq!(fields::parse_price("1 234,56 ₸"), Some(1234.56));
}

#[test]
fn price_parses_bare_integers() {
    assert_eq!(fields::parse_price("999"), Some(999.0));
}

#[test]
fn price_rejects_digit_free_text() {
    assert_eq!(fields::parse_price("call for price"), None);
}

#[test]
fn price_prefers_the_discounted_span() {
    let d = doc(concat!(
        "<div class=\"product__prices\">",
        "<span class=\"new-price\">1 234,56 ₸</span>",
        "<span class=\"old-price\">2 000 ₸</span>",
        "</div>",
    ));
    assert_eq!(fields::extract_price(&d), 1234.56);
}

#[test]
fn price_accepts_the_old_price_only_when_positive() {
    let zero_old = doc(concat!(
        "<div class=\"product__prices\"><span class=\"old-price\">0,00</span></div>",
        "<head><meta itemprop=\"price\" content=\"500\"></head>",
    ));
    assert_eq!(fields::extract_price(&zero_old), 500.0);

    let real_old = doc("<div class=\"product__prices\"><span class=\"old-price\">2 000</span></div>");
    assert_eq!(fields::extract_price(&real_old), 2000.0);
}

#[test]
fn price_falls_back_to_the_checked_variant() {
    let d = doc("<input class=\"variant-radio checked\" data-price=\"3 500\">");
    assert_eq!(fields::extract_price(&d), 3500.0);
}

#[test]
fn price_accepts_any_checked_input_without_a_variant_radio() {
    let d = doc("<form><input type=\"radio\" checked data-price=\"750\"></form>");
    assert_eq!(fields::extract_price(&d), 750.0);
}

#[test]
fn price_falls_back_to_meta_price() {
    let d = doc("<head><meta itemprop=\"price\" content=\"9 999\"></head>");
    assert_eq!(fields::extract_price(&d), 9999.0);
}

#[test]
fn price_zero_when_nothing_matches() {
    assert_eq!(fields::extract_price(&doc("<p>call us</p>")), 0.0);
}

#[test]
fn unparseable_candidate_falls_through() {
    let d = doc(concat!(
        "<div class=\"product__prices\"><span class=\"new-price\">по запросу</span></div>",
        "<head><meta itemprop=\"price\" content=\"640\"></head>",
    ));
    assert_eq!(fields::extract_price(&d), 640.0);
}

// --- stock chain ---

#[test]
fn stock_prefers_the_success_span() {
    let d = doc(concat!(
        "<ul class=\"product__meta\">",
        "<li><span class=\"text-success\">In stock</span></li>",
        "<li class=\"product__meta-availability\"><span>Backorder</span></li>",
        "</ul>",
    ));
    assert_eq!(fields::extract_stock(&d), "In stock");
}

#[test]
fn stock_falls_back_to_the_availability_item() {
    let d = doc(concat!(
        "<ul class=\"product__meta\">",
        "<li class=\"product__meta-availability\"><span>Backorder</span></li>",
        "</ul>",
    ));
    assert_eq!(fields::extract_stock(&d), "Backorder");
}

#[test]
fn stock_sentinel_without_the_meta_list() {
    assert_eq!(fields::extract_stock(&doc("<p>nothing</p>")), NO_DATA);
}

// --- attributes ---

fn spec_markup() -> &'static str {
    concat!(
        "<div id=\"tab-specification\"><div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Brand:</div><div class=\"spec__value\">Makita</div>",
        "</div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Weight:</div><div class=\"spec__value\">2.1 kg</div>",
        "</div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">WEIGHT</div><div class=\"spec__value\">2100 g</div>",
        "</div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Chuck type:</div>",
        "<div class=\"spec__value\"><a href=\"/f\">Keyless</a></div>",
        "</div>",
        "</div></div></div>",
    )
}

#[test]
fn attributes_exclude_first_class_fields_and_case_insensitive_repeats() {
    let d = doc(spec_markup());
    let attrs = attributes::extract_attributes(&d);
    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Weight", "Chuck type"]);
    assert_eq!(attrs[0].value, "2.1 kg");
    assert_eq!(attrs[1].value, "Keyless");
}

#[test]
fn attributes_extraction_is_idempotent() {
    let d = doc(spec_markup());
    let first = attributes::extract_attributes(&d);
    let second = attributes::extract_attributes(&d);
    assert_eq!(first, second);
}

#[test]
fn attributes_scan_additional_spec_blocks_once() {
    // The tab's section is also reachable through the bare spec-block
    // scan; a second, standalone block contributes its own rows.
    let markup = concat!(
        "<div id=\"tab-specification\"><div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Weight:</div><div class=\"spec__value\">2.1 kg</div>",
        "</div>",
        "</div></div></div>",
        "<div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Voltage:</div><div class=\"spec__value\">18 V</div>",
        "</div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Weight:</div><div class=\"spec__value\">duplicate</div>",
        "</div>",
        "</div></div>",
    );
    let attrs = attributes::extract_attributes(&doc(markup));
    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Weight", "Voltage"]);
    assert_eq!(attrs[0].value, "2.1 kg");
}

#[test]
fn attributes_skip_rows_missing_a_cell() {
    let markup = concat!(
        "<div class=\"spec\"><div class=\"spec__section\">",
        "<div class=\"spec__row\"><div class=\"spec__name\">Orphan:</div></div>",
        "<div class=\"spec__row\">",
        "<div class=\"spec__name\">Weight:</div><div class=\"spec__value\">2.1 kg</div>",
        "</div>",
        "</div></div>",
    );
    let attrs = attributes::extract_attributes(&doc(markup));
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].name, "Weight");
}

// --- assembler ---

#[test]
fn bare_page_degrades_to_sentinels_not_errors() {
    let product = parse_product_markup("<html><body></body></html>", "https://optostroy.com/products/x");

    assert_eq!(product.title, NO_DATA);
    assert_eq!(product.description, NO_DATA);
    assert_eq!(product.article, NO_DATA);
    assert_eq!(product.brand, NO_DATA);
    assert_eq!(product.country_of_origin, NO_DATA);
    assert_eq!(product.category, NO_DATA);
    assert!(product.attributes.is_empty());

    let offer = &product.suppliers[0].offers[0];
    assert_eq!(offer.prices[0].price, 0.0);
    assert_eq!(offer.stock, NO_DATA);
    assert_eq!(offer.purchase_url, "https://optostroy.com/products/x");
}
