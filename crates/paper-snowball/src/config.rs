//! Configuration for the paper search client.

use std::time::Duration;

use anyhow::Context;

/// Backend connection constants.
pub mod api {
    use std::time::Duration;

    /// Default base URL of the search/reference backend.
    pub const BASE_URL: &str = "http://localhost:8000/api";

    /// Environment variable overriding [`BASE_URL`].
    pub const BASE_URL_ENV: &str = "PAPER_SNOWBALL_API_URL";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Suggestion cache TTL (10 minutes).
    pub const SUGGESTION_CACHE_TTL: Duration = Duration::from_secs(600);

    /// Maximum number of cached suggestion lists.
    pub const SUGGESTION_CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Defaults applied while coercing raw records.
pub mod defaults {
    /// Title used when a record has none.
    pub const UNTITLED: &str = "Untitled Paper";

    /// Placeholder shown when a paper has no abstract.
    pub const NO_ABSTRACT: &str = "No abstract available.";

    /// Minimum trimmed length of a suggestion query.
    pub const MIN_SUGGESTION_QUERY_LEN: usize = 3;

    /// Hard ceiling on reference tree levels, independent of the requested depth.
    pub const MAX_REFERENCE_NESTING: usize = 2;
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend (without trailing slash).
    pub base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Suggestion cache TTL.
    pub suggestion_cache_ttl: Duration,

    /// Maximum suggestion cache size.
    pub suggestion_cache_max_size: u64,
}

impl Config {
    /// Create a configuration pointing at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self { base_url: validate_base_url(base_url)?, ..Self::default() })
    }

    /// Create a test configuration for a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            suggestion_cache_ttl: Duration::from_secs(0), // No caching in tests
            suggestion_cache_max_size: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if `PAPER_SNOWBALL_API_URL` is set but invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(api::BASE_URL_ENV) {
            Ok(url) => Self::new(&url),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Build the absolute URL of a backend endpoint.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Whether suggestion responses are cached.
    #[must_use]
    pub const fn caches_suggestions(&self) -> bool {
        self.suggestion_cache_max_size > 0 && !self.suggestion_cache_ttl.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            suggestion_cache_ttl: api::SUGGESTION_CACHE_TTL,
            suggestion_cache_max_size: api::SUGGESTION_CACHE_MAX_SIZE,
        }
    }
}

fn validate_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("invalid backend URL: {trimmed}"))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("backend URL must use http or https, got {}", parsed.scheme());
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, api::BASE_URL);
        assert!(config.caches_suggestions());
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = Config::new("https://scholar.example.org/api/").unwrap();
        assert_eq!(config.base_url, "https://scholar.example.org/api");
        assert_eq!(
            config.endpoint("/search_papers"),
            "https://scholar.example.org/api/search_papers"
        );
    }

    #[test]
    fn test_config_rejects_bad_urls() {
        assert!(Config::new("not a url").is_err());
        assert!(Config::new("ftp://example.org/api").is_err());
    }

    #[test]
    fn test_testing_config_disables_cache() {
        let config = Config::for_testing("http://127.0.0.1:1234/");
        assert!(!config.caches_suggestions());
        assert_eq!(config.endpoint("suggest"), "http://127.0.0.1:1234/suggest");
    }
}
