//! Municipality link resolution on a district listing page

use crate::crawler::document::{is_digits, text_of, Document};
use crate::dataset::SubEntity;
use crate::url::detail_url;
use crate::Result;

/// Finds every municipality linked from a listing page
///
/// An anchor qualifies when its text is all digits (the municipality code)
/// and its `href` contains `detail_marker`. The name is the text of the next
/// `td` after the anchor; anchors without one are skipped. Results keep
/// document order. An empty result is returned as-is, the caller decides
/// whether that is fatal.
///
/// # Example
///
/// ```
/// use tally_harvest::crawler::{resolve_links, Document};
///
/// let doc = Document::parse(r#"<table><tr>
///     <td><a href="ps311?xobec=101">101</a></td><td>Alpha</td>
/// </tr></table>"#);
/// let entities = resolve_links(&doc, "http://host/", "ps311").unwrap();
/// assert_eq!(entities[0].name, "Alpha");
/// assert_eq!(entities[0].detail_url, "http://host/ps311?xobec=101");
/// ```
pub fn resolve_links(doc: &Document, base: &str, detail_marker: &str) -> Result<Vec<SubEntity>> {
    let mut entities = Vec::new();

    for anchor in doc.elements("a")? {
        let code_text = text_of(anchor);
        let href = anchor.value().attr("href").unwrap_or("");
        if !is_digits(&code_text) || !href.contains(detail_marker) {
            continue;
        }

        let Ok(code) = code_text.parse::<u32>() else {
            tracing::debug!("Skipping anchor with out-of-range code '{}'", code_text);
            continue;
        };

        let Some(name_cell) = doc.next_cell_after(anchor) else {
            tracing::debug!("Skipping anchor {} without a name cell", code);
            continue;
        };

        entities.push(SubEntity {
            code,
            name: text_of(name_cell),
            detail_url: detail_url(base, href),
        });
    }

    Ok(entities)
}
