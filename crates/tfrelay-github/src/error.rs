//! Error types for GitHub API operations.

use thiserror::Error;
use tfrelay_core::SourceError;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The configured API URL is not usable.
    #[error("Invalid GitHub URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Failed to connect to the API.
    #[error("Failed to connect to {url}: {source}")]
    ConnectionFailed {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The token cannot be sent as a header.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// Repository not found or not visible with the configured token.
    #[error("repository {owner}/{repo} not found")]
    NotFound {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },

    /// HTTP error from the API.
    #[error("GET {url}: {status} {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The API answered with an unexpected body.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// An asset download did not redirect to a signed URL.
    #[error("No redirect location for asset {asset_id}")]
    MissingRedirect {
        /// Asset identifier.
        asset_id: u64,
    },
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map_or_else(|| "unknown".to_string(), ToString::to_string);

        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed { url, source: err }
        } else if err.is_decode() {
            Self::InvalidResponse {
                url,
                message: err.to_string(),
            }
        } else {
            Self::HttpError {
                url,
                status: err.status().map_or(0, |s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<GithubError> for SourceError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::NotFound { owner, repo } => Self::NotFound { owner, repo },
            GithubError::HttpError {
                status, message, ..
            } => Self::Http { status, message },
            GithubError::ConnectionFailed { .. } => Self::Transport {
                message: err.to_string(),
            },
            GithubError::InvalidUrl { .. }
            | GithubError::ClientBuild { .. }
            | GithubError::AuthenticationFailed { .. }
            | GithubError::InvalidResponse { .. }
            | GithubError::MissingRedirect { .. } => Self::InvalidResponse {
                message: err.to_string(),
            },
        }
    }
}
