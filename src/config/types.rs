use serde::Deserialize;

/// Main configuration structure for Tally-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub summary: SummaryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Substring a listing URL must contain to be accepted
    #[serde(rename = "listing-marker")]
    pub listing_marker: String,

    /// Substring an anchor's href must contain to count as a detail link
    #[serde(rename = "detail-marker")]
    pub detail_marker: String,

    /// Number of detail pages fetched at once (1 = sequential)
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Total request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_marker: "ps32".to_string(),
            detail_marker: "ps311".to_string(),
            max_concurrent_fetches: 1,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Header-reference codes locating the summary statistics cells
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// `headers` attribute of the registered voters cell
    #[serde(rename = "registered-header")]
    pub registered_header: String,

    /// `headers` attribute of the envelopes issued cell
    #[serde(rename = "envelopes-header")]
    pub envelopes_header: String,

    /// `headers` attribute of the valid votes cell
    #[serde(rename = "valid-header")]
    pub valid_header: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            registered_header: "sa2".to_string(),
            envelopes_header: "sa3".to_string(),
            valid_header: "sa6".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Optional URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "tally-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter of the written table
    pub delimiter: char,

    /// Whether to prefix the file with a UTF-8 byte order mark
    #[serde(rename = "byte-order-mark")]
    pub byte_order_mark: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            byte_order_mark: true,
        }
    }
}
