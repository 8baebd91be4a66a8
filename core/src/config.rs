//! Client configuration.
//!
//! # Design
//! `ClientConfig` is built once and handed to `BuzzsproutClient`, which never
//! mutates it. The base URL defaults to the production API and can be
//! pointed elsewhere for tests. The API key is a secret, so `Debug` prints a
//! placeholder instead.

use std::fmt;
use std::time::Duration;

/// Production API root. Every endpoint path is appended to this.
pub const DEFAULT_BASE_URL: &str = "https://www.buzzsprout.com/api";

/// Settings a `BuzzsproutClient` is built from. Fixed for the client's lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Point the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Overall deadline for each request made by the default transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Value of the `authorization` header sent with every request.
    pub fn authorization(&self) -> String {
        format!("Token token={}", self.api_key)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_api() {
        let config = ClientConfig::new("K");
        assert_eq!(config.base_url(), "https://www.buzzsprout.com/api");
        assert_eq!(config.api_key(), "K");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("K").with_base_url("http://localhost:3000/api/");
        assert_eq!(config.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn authorization_uses_token_scheme() {
        assert_eq!(
            ClientConfig::new("abc123").authorization(),
            "Token token=abc123"
        );
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let config = ClientConfig::new("super-secret").with_timeout(Duration::from_secs(3));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
