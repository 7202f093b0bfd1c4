//! URL handling module for Tally-Harvest
//!
//! Validation of the listing URL given on the command line and derivation of
//! the base URL that relative detail links are appended to.

use crate::HarvestError;
use url::Url;

/// Validates a listing URL before any network access
///
/// The URL must parse, use the `http` or `https` scheme, and contain the
/// configured listing marker.
///
/// # Examples
///
/// ```
/// use tally_harvest::url::validate_listing_url;
///
/// assert!(validate_listing_url("https://volby.cz/pls/ps2017nss/ps32?xjazyk=CZ", "ps32").is_ok());
/// assert!(validate_listing_url("https://volby.cz/pls/ps2017nss/ps311", "ps32").is_err());
/// ```
pub fn validate_listing_url(raw: &str, marker: &str) -> Result<Url, HarvestError> {
    let invalid = |reason: String| HarvestError::InvalidListingUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!(
            "scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }

    if !raw.contains(marker) {
        return Err(invalid(format!(
            "not a municipality listing page (missing '{}')",
            marker
        )));
    }

    Ok(url)
}

/// Returns the listing URL with its last path segment removed, plus a trailing `/`
///
/// Detail links on the listing page are relative references such as
/// `ps311?xjazyk=CZ&xobec=506761`, which are concatenated onto this base.
///
/// # Examples
///
/// ```
/// use tally_harvest::url::base_url;
///
/// assert_eq!(
///     base_url("https://volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12"),
///     "https://volby.cz/pls/ps2017nss/"
/// );
/// ```
pub fn base_url(listing_url: &str) -> String {
    match listing_url.rsplit_once('/') {
        Some((head, _)) => format!("{}/", head),
        None => format!("{}/", listing_url),
    }
}

/// Builds the absolute detail URL for a raw anchor reference
pub fn detail_url(base: &str, href: &str) -> String {
    format!("{}{}", base, href)
}
