//! Plain HTTP GET for checksum files and signing keys.

use std::time::Duration;

use async_trait::async_trait;
use tfrelay_core::{FetchError, FetchResponse, HttpFetch};

use crate::error::GithubError;

/// Unauthenticated [`HttpFetch`] over `reqwest`.
///
/// Follows redirects, so both browser download URLs and signed asset URLs
/// work.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| GithubError::ClientBuild { source })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;

        tracing::debug!(url = %url, status, bytes = body.len(), "Fetched");
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
