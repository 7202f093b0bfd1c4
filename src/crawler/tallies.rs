//! Party vote tallies of a municipality detail page

use crate::crawler::document::{cells, is_digits, strip_whitespace, text_of, Document};
use crate::dataset::TallyMap;
use crate::{HarvestError, Result};

/// Extracts party name -> vote count from every tally row of the page
///
/// A tally row has at least three cells and an all-digit first cell (the
/// party number, used only to recognise the row). The second cell is the
/// party name, the third the vote count. Rows whose count is not a number
/// after whitespace removal are skipped. A repeated party name overwrites
/// the earlier count but keeps its original position.
///
/// `url` only labels the [`HarvestError::NoTallies`] error.
pub fn extract_tallies(doc: &Document, url: &str) -> Result<TallyMap> {
    let mut tallies = TallyMap::new();

    for row in doc.elements("tr")? {
        let cells = cells(row)?;
        if cells.len() < 3 || !is_digits(&text_of(cells[0])) {
            continue;
        }

        let party = text_of(cells[1]);
        let votes = strip_whitespace(&text_of(cells[2]));
        if !is_digits(&votes) {
            continue;
        }

        let votes = votes.parse().map_err(|_| HarvestError::InvalidNumber {
            field: party.clone(),
            text: votes.clone(),
        })?;
        tallies.insert(party, votes);
    }

    if tallies.is_empty() {
        return Err(HarvestError::NoTallies {
            url: url.to_string(),
        });
    }

    Ok(tallies)
}
