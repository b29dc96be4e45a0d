//! Minimal query surface over the HTML parser.
//!
//! Field extractors only ever need "first element matching a selector",
//! "elements matching a selector", normalized text, and attribute lookup.
//! Keeping them behind this wrapper keeps the extraction policy
//! independent of the parser crate's API.

use scraper::{ElementRef, Html, Selector};

/// An immutable parsed page. Built once per product page; every extractor
/// reads from the same tree and none mutate it.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// First element matching `selector`, in document order.
    pub fn find<'a>(&'a self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }

    /// All elements matching `selector`, in document order.
    pub fn find_all<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }
}

/// First descendant of `element` matching `selector`.
pub fn find_in<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Concatenated descendant text with each fragment trimmed, in the manner
/// of a whitespace-stripping text accessor. `<span> 1 234 </span>` yields
/// `"1 234"`; text split across inline tags is joined without separators.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Attribute value, if present.
pub fn attr_of<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// True when the element carries the given class.
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
