//! Collaborators the resolution engine consumes.
//!
//! The engine never talks to the network itself. Releases, asset download
//! locators and raw HTTP fetches all come through these traits so that the
//! hosting binary decides on transport, credentials and timeouts.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Asset, Release};

/// Errors reported by a [`ReleaseSource`] or [`AssetLocator`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The repository does not exist or is not visible.
    #[error("repository {owner}/{repo} not found")]
    NotFound {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },

    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Upstream could not be reached.
    #[error("upstream unreachable: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Upstream answered with something that could not be understood.
    #[error("invalid upstream response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

/// Error from an [`HttpFetch`] call that never produced a response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Error message.
        message: String,
    },
}

/// Status and body of a completed HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Lists the releases of a repository.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Returns the releases of `owner/repo` in upstream order.
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, SourceError>;
}

/// Turns an asset into a URL a client can download from.
#[async_trait]
pub trait AssetLocator: Send + Sync {
    /// Returns either a short-lived signed URL or the public browser URL.
    async fn resolve_download_url(
        &self,
        owner: &str,
        repo: &str,
        asset: &Asset,
    ) -> Result<String, SourceError>;
}

/// Plain HTTP GET.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetches `url`. Non-success statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Locator that always hands out the public browser URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserUrlLocator;

#[async_trait]
impl AssetLocator for BrowserUrlLocator {
    async fn resolve_download_url(
        &self,
        _owner: &str,
        _repo: &str,
        asset: &Asset,
    ) -> Result<String, SourceError> {
        Ok(asset.browser_download_url.clone())
    }
}
