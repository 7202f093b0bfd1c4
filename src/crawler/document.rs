//! Queryable view of a parsed HTML page
//!
//! Wraps `scraper::Html` with the handful of queries the extractors need:
//! elements by tag, cells by their `headers` reference, normalized text, and
//! the first table cell following an element in document order.

use crate::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML page (never fails; malformed markup is repaired)
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All elements with the given tag name, in document order
    pub fn elements(&self, tag: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = create_selector(tag)?;
        Ok(self.html.select(&selector).collect())
    }

    /// First `td` whose space-separated `headers` list contains `header`
    pub fn cell_by_header(&self, header: &str) -> Result<Option<ElementRef<'_>>> {
        Ok(self.elements("td")?.into_iter().find(|td| {
            td.value()
                .attr("headers")
                .is_some_and(|ids| ids.split_ascii_whitespace().any(|id| id == header))
        }))
    }

    /// First `td` that starts after `element` in document order
    pub fn next_cell_after(&self, element: ElementRef<'_>) -> Option<ElementRef<'_>> {
        let id = element.id();
        self.html
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "td")
    }
}

/// `td` cells nested anywhere below `row`
pub fn cells<'a>(row: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>> {
    let selector = create_selector("td")?;
    Ok(row.select(&selector).collect())
}

/// Text content with every text node trimmed and joined without separators
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Removes every whitespace character, including non-breaking spaces
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True for a non-empty string of ASCII digits
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| HarvestError::Selector(sel_str.to_string()))
}
