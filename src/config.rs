//! Client configuration
//!
//! Endpoint configuration with environment variable support and
//! sensible defaults. Built once, then shared read-only by the request
//! executor and the event stream.

use std::env;
use std::time::Duration;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8283";

/// Per-attempt request timeout used when none (or zero) is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Attempt budget used when none (or zero) is configured
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// One backoff unit; the delay before retry `i` is `2^i` units
pub const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;

/// Which failures the request executor retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Retry every attempt failure (transport, timeout, HTTP status,
    /// rejected envelope, undecodable body) until the budget runs out
    #[default]
    Uniform,
    /// Retry only timeouts, transport failures, 5xx and 429 responses.
    /// Deterministic rejections surface after the first attempt.
    TransientOnly,
}

impl RetryMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uniform" | "all" => Some(RetryMode::Uniform),
            "transient" | "transient_only" | "transient-only" => Some(RetryMode::TransientOnly),
            _ => None,
        }
    }
}

/// Endpoint configuration for the agent server
///
/// Fields are private so a built configuration cannot change underneath a
/// running client; use the `with_*` builders before constructing one.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry_attempts: u32,
    backoff_unit: Duration,
    retry_mode: RetryMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default settings
    ///
    /// A trailing slash on the base URL is stripped so paths can be
    /// appended verbatim.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff_unit: Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
            retry_mode: RetryMode::Uniform,
        }
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            env::var("AGENT_SERVER_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );

        if let Ok(key) = env::var("AGENT_SERVER_API_KEY") {
            config = config.with_api_key(key);
        }
        if let Some(secs) = env::var("AGENT_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = env::var("AGENT_RETRY_ATTEMPTS")
            .ok()
            .and_then(|a| a.parse().ok())
        {
            config = config.with_retry_attempts(attempts);
        }
        if let Some(ms) = env::var("AGENT_BACKOFF_UNIT_MS")
            .ok()
            .and_then(|m| m.parse().ok())
        {
            config = config.with_backoff_unit(Duration::from_millis(ms));
        }
        if let Some(mode) = env::var("AGENT_RETRY_MODE")
            .ok()
            .and_then(|m| RetryMode::parse(&m))
        {
            config = config.with_retry_mode(mode);
        }

        config
    }

    /// Set the static API key used when no per-request token is available
    ///
    /// An empty key is treated as no key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    /// Set the per-attempt timeout (zero falls back to the default)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            timeout
        };
        self
    }

    /// Set the attempt budget (zero falls back to the default)
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = if attempts == 0 {
            DEFAULT_RETRY_ATTEMPTS
        } else {
            attempts
        };
        self
    }

    /// Set the backoff time unit
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Set which failures are retried
    pub fn with_retry_mode(mut self, mode: RetryMode) -> Self {
        self.retry_mode = mode;
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Static API key, if configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum number of physical attempts per logical operation
    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    /// Backoff time unit
    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Retry classification mode
    pub fn retry_mode(&self) -> RetryMode {
        self.retry_mode
    }
}

fn normalize_base_url(base_url: String) -> String {
    match base_url.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8283");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_attempts(), 3);
        assert_eq!(config.backoff_unit(), Duration::from_secs(1));
        assert_eq!(config.retry_mode(), RetryMode::Uniform);
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ClientConfig::new("https://agents.example.com/api/");
        assert_eq!(config.base_url(), "https://agents.example.com/api");
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let config = ClientConfig::new("http://x")
            .with_retry_attempts(0)
            .with_timeout(Duration::ZERO)
            .with_api_key("");
        assert_eq!(config.retry_attempts(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_retry_mode_parse() {
        assert_eq!(RetryMode::parse("uniform"), Some(RetryMode::Uniform));
        assert_eq!(RetryMode::parse(" Transient "), Some(RetryMode::TransientOnly));
        assert_eq!(RetryMode::parse("sometimes"), None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("AGENT_SERVER_URL", "http://letta.internal:9000/");
        env::set_var("AGENT_SERVER_API_KEY", "static-key");
        env::set_var("AGENT_REQUEST_TIMEOUT_SECS", "5");
        env::set_var("AGENT_RETRY_ATTEMPTS", "not-a-number");
        env::set_var("AGENT_RETRY_MODE", "transient");

        let config = ClientConfig::from_env();

        env::remove_var("AGENT_SERVER_URL");
        env::remove_var("AGENT_SERVER_API_KEY");
        env::remove_var("AGENT_REQUEST_TIMEOUT_SECS");
        env::remove_var("AGENT_RETRY_ATTEMPTS");
        env::remove_var("AGENT_RETRY_MODE");

        assert_eq!(config.base_url(), "http://letta.internal:9000");
        assert_eq!(config.api_key(), Some("static-key"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_attempts(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.retry_mode(), RetryMode::TransientOnly);
    }
}
