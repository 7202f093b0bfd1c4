//! Tally-Harvest: a two-level election results scraper
//!
//! This crate crawls a district listing page, visits every municipality's
//! detail page, extracts the summary statistics and party vote tallies, and
//! reconciles the variable party columns into a single fixed-width dataset.

pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Tally-Harvest operations
///
/// Every variant is fatal for a run: nothing is retried and no partial
/// dataset is ever written.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid listing URL '{url}': {reason}")]
    InvalidListingUrl { url: String, reason: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Missing field '{field}' (no cell with headers=\"{header}\")")]
    MissingField { field: &'static str, header: String },

    #[error("Field '{field}' is not a number: '{text}'")]
    InvalidNumber { field: String, text: String },

    #[error("No party vote results were found at {url}")]
    NoTallies { url: String },

    #[error("No municipalities were found at {url}")]
    NoSubEntities { url: String },

    #[error("Municipality {name} ({code}): {source}")]
    Page {
        code: u32,
        name: String,
        #[source]
        source: Box<HarvestError>,
    },

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl HarvestError {
    /// Attaches the municipality a detail-page failure belongs to
    pub fn for_page(self, code: u32, name: &str) -> Self {
        HarvestError::Page {
            code,
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while writing the final dataset
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Row {row} has {found} fields, header has {expected}")]
    Width {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Result type alias for Tally-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Harvest};
pub use dataset::{Dataset, Row, SchemaHeader, SubEntity, SummaryStats, TallyMap};
pub use output::{DelimitedWriter, TabularWriter};
