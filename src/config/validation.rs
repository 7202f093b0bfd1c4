use crate::config::types::{Config, CrawlerConfig, OutputConfig, SummaryConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound for `max-concurrent-fetches`
const MAX_CONCURRENT_FETCHES: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_summary_config(&config.summary)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_marker("listing-marker", &config.listing_marker)?;
    validate_marker("detail-marker", &config.detail_marker)?;

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the summary header codes: present, whitespace-free, distinct
fn validate_summary_config(config: &SummaryConfig) -> Result<(), ConfigError> {
    let headers = [
        ("registered-header", &config.registered_header),
        ("envelopes-header", &config.envelopes_header),
        ("valid-header", &config.valid_header),
    ];

    for (key, value) in headers {
        validate_marker(key, value)?;
    }

    for (i, (key_a, a)) in headers.iter().enumerate() {
        for (key_b, b) in &headers[i + 1..] {
            if a == b {
                return Err(ConfigError::Validation(format!(
                    "{} and {} must differ, both are '{}'",
                    key_a, key_b, a
                )));
            }
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if !config.contact_url.is_empty() {
        url::Url::parse(&config.contact_url).map_err(|e| {
            ConfigError::Validation(format!("Invalid contact-url '{}': {}", config.contact_url, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    validate_delimiter(config.delimiter)
}

/// A delimiter must be a single printable ASCII separator that never
/// collides with quoting or record boundaries
pub fn validate_delimiter(delimiter: char) -> Result<(), ConfigError> {
    let ok = delimiter == '\t'
        || (delimiter.is_ascii_punctuation() && delimiter != '"')
        || delimiter == ' ';

    if !ok {
        return Err(ConfigError::Validation(format!(
            "delimiter must be a tab, space or ASCII punctuation other than '\"', got {:?}",
            delimiter
        )));
    }

    Ok(())
}

/// Markers and header codes: non-empty and without whitespace
fn validate_marker(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }

    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain whitespace, got '{}'",
            key, value
        )));
    }

    Ok(())
}
