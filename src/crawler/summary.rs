//! Summary statistics of a municipality detail page

use crate::config::SummaryConfig;
use crate::crawler::document::{is_digits, strip_whitespace, text_of, Document};
use crate::dataset::SummaryStats;
use crate::{HarvestError, Result};

/// Extracts registered voters, envelopes issued and valid votes
///
/// Each value is the `td` whose `headers` attribute equals the configured
/// code. A missing cell is a [`HarvestError::MissingField`]; a cell that is
/// not a number after cleanup is a [`HarvestError::InvalidNumber`].
pub fn extract_summary(doc: &Document, config: &SummaryConfig) -> Result<SummaryStats> {
    Ok(SummaryStats {
        registered: count_by_header(doc, "registered", &config.registered_header)?,
        envelopes_issued: count_by_header(doc, "envelopes", &config.envelopes_header)?,
        valid_count: count_by_header(doc, "valid", &config.valid_header)?,
    })
}

fn count_by_header(doc: &Document, field: &'static str, header: &str) -> Result<u64> {
    let cell = doc
        .cell_by_header(header)?
        .ok_or_else(|| HarvestError::MissingField {
            field,
            header: header.to_string(),
        })?;

    parse_count(field, &text_of(cell))
}

/// Parses a displayed count such as `"1 234"`, `"1\u{a0}234"` or `"1,234"`
///
/// All whitespace (non-breaking spaces included) and `,` group separators
/// are removed; anything but digits left over is an error.
pub fn parse_count(field: &str, text: &str) -> Result<u64> {
    let cleaned = strip_whitespace(text).replace(',', "");
    let invalid = || HarvestError::InvalidNumber {
        field: field.to_string(),
        text: text.to_string(),
    };

    if !is_digits(&cleaned) {
        return Err(invalid());
    }

    cleaned.parse().map_err(|_| invalid())
}
