//! Crawler module for page fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching and the parsed-document view
//! - Municipality link resolution on the listing page
//! - Summary and party tally extraction on detail pages
//! - Overall run coordination

mod coordinator;
mod document;
mod fetcher;
mod links;
mod summary;
mod tallies;

pub use coordinator::{parse_detail, Coordinator, DetailPage, Harvest};
pub use document::{is_digits, strip_whitespace, text_of, Document};
pub use fetcher::{build_http_client, Fetcher};
pub use links::resolve_links;
pub use summary::{extract_summary, parse_count};
pub use tallies::extract_tallies;
