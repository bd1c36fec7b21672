//! Configuration types for the GitHub client.

use std::time::Duration;

use url::Url;

use crate::error::GithubError;

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Path suffix of the REST API on GitHub Enterprise Server.
const ENTERPRISE_API_PATH: &str = "/api/v3";

/// Configuration for [`crate::GithubClient`].
#[derive(Clone)]
pub struct GithubConfig {
    /// REST API base URL, without a trailing slash.
    pub api_url: String,

    /// Token sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubConfig {
    /// Creates a configuration for the public GitHub API.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfrelay_github::GithubConfig;
    ///
    /// let config = GithubConfig::new();
    /// assert_eq!(config.api_url, "https://api.github.com");
    /// assert!(config.token.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("tfrelay/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Points the client at a GitHub Enterprise Server instance.
    ///
    /// Accepts the server's base URL with or without the `/api/v3` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidUrl`] if `url` is not an absolute
    /// http(s) URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfrelay_github::GithubConfig;
    ///
    /// let config = GithubConfig::new()
    ///     .with_enterprise_url("https://github.example.com/")?;
    /// assert_eq!(config.api_url, "https://github.example.com/api/v3");
    /// # Ok::<(), tfrelay_github::GithubError>(())
    /// ```
    pub fn with_enterprise_url(mut self, url: &str) -> Result<Self, GithubError> {
        self.api_url = normalize_enterprise_url(url)?;
        Ok(self)
    }

    /// Sets the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true when a token is configured.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

fn normalize_enterprise_url(raw: &str) -> Result<String, GithubError> {
    let invalid = || GithubError::InvalidUrl {
        url: raw.to_string(),
    };

    let parsed = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }

    let base = parsed.as_str().trim_end_matches('/');
    if base.ends_with(ENTERPRISE_API_PATH) {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}{ENTERPRISE_API_PATH}"))
    }
}
