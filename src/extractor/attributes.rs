//! Free-form specification rows, minus the fields extracted first-class.
//!
//! Every call scans the page from scratch with an empty seen-set, so
//! re-running over the same tree yields the identical ordered list.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::entities::Attribute;
use crate::extractor::document::{Document, find_in, text_of};

static SPEC_TAB: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#tab-specification").unwrap());
static SPEC_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.spec").unwrap());
static SPEC_SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.spec__section").unwrap());
static SPEC_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.spec__row").unwrap());
static SPEC_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.spec__name").unwrap());
static SPEC_VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.spec__value").unwrap());
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Row names that duplicate first-class product fields. Compared against
/// the lowercased name after colon/whitespace trimming.
const EXCLUDED_NAMES: [&str; 11] = [
    "name",
    "description",
    "article",
    "category",
    "price",
    "cost",
    "in stock",
    "availability",
    "brand",
    "make",
    "country of origin",
];

/// Collects attribute rows from the specification tab's section and every
/// other spec block's section, in document order of first occurrence.
/// Names are emitted once, case-insensitively.
pub fn extract_attributes(doc: &Document) -> Vec<Attribute> {
    let mut sections: Vec<ElementRef<'_>> = Vec::new();

    if let Some(section) = doc.find(&SPEC_TAB).and_then(|tab| find_in(tab, &SPEC_SECTION)) {
        sections.push(section);
    }

    // Same section nodes can be reachable through both the tab and a bare
    // spec block; node identity keeps them from being scanned twice.
    for block in doc.find_all(&SPEC_BLOCK) {
        if let Some(section) = find_in(block, &SPEC_SECTION)
            && !sections.iter().any(|seen| seen.id() == section.id())
        {
            sections.push(section);
        }
    }

    let mut attributes = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    for section in sections {
        for row in section.select(&SPEC_ROW) {
            let (Some(name_cell), Some(value_cell)) =
                (find_in(row, &SPEC_NAME), find_in(row, &SPEC_VALUE))
            else {
                continue;
            };

            let name = text_of(name_cell);
            // Linked values (brand pages, material filters) carry the
            // display text in the anchor.
            let value = match find_in(value_cell, &A) {
                Some(link) => text_of(link),
                None => text_of(value_cell),
            };

            if name.is_empty() || value.is_empty() {
                continue;
            }

            let name_clean = name.strip_suffix(':').unwrap_or(&name).trim().to_string();
            let name_lower = name_clean.to_lowercase();
            if name_clean.is_empty() || EXCLUDED_NAMES.contains(&name_lower.as_str()) {
                continue;
            }
            if seen_names.contains(&name_lower) {
                continue;
            }

            attributes.push(Attribute {
                name: name_clean,
                value,
            });
            seen_names.insert(name_lower);
        }
    }

    attributes
}
