//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning the page body
//! - Classifying transport failures and non-success status codes
//!
//! There is no retry: any failure is returned to the caller, which aborts
//! the run.

use crate::config::Config;
use crate::crawler::document::Document;
use crate::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use tally_harvest::config::Config;
/// use tally_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Document Accessor: fetches pages and hands back their text or a parsed view
///
/// Cloning is cheap; the underlying client is reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the response body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of a 2xx response
    /// * `Err(HarvestError::HttpStatus)` - Server answered with a non-success status
    /// * `Err(HarvestError::Http)` - Connection, timeout, or body decoding failure
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Fetched {} ({}, {} bytes)", url, status, body.len());
        Ok(body)
    }

    /// Fetches `url` and parses the body
    pub async fn fetch_document(&self, url: &str) -> Result<Document> {
        let body = self.fetch_text(url).await?;
        Ok(Document::parse(&body))
    }
}
