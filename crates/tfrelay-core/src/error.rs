//! Error types for provider resolution.
//!
//! Every variant is terminal for the request that raised it. The protocol
//! surface reports all of them the same way, so the messages are what
//! clients see.

use thiserror::Error;

use crate::integrity::IntegrityError;
use crate::keys::KeyError;
use crate::source::SourceError;

/// Result type alias using [`RegistryError`] as the error type.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while answering a provider request.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The path tail is neither `versions` nor a download request.
    #[error("invalid request")]
    InvalidRequest {
        /// Offending path tail.
        tail: String,
    },

    /// The release listing could not be obtained.
    #[error("{source}")]
    UpstreamUnavailable {
        /// Underlying error.
        #[source]
        source: SourceError,
    },

    /// No release carries a checksums file for the version.
    #[error("cannot find version: {version}")]
    VersionNotFound {
        /// Requested version.
        version: String,
    },

    /// The archive digest could not be obtained.
    #[error("failed getting shasum {source}")]
    ShasumUnavailable {
        /// Underlying error.
        #[source]
        source: IntegrityError,
    },

    /// The signing key could not be obtained.
    #[error("failed getting pgp keys {source}")]
    KeyUnavailable {
        /// Underlying error.
        #[source]
        source: KeyError,
    },

    /// The action segment is not `download`.
    #[error("unsupported action {action}")]
    UnsupportedAction {
        /// Requested action.
        action: String,
    },
}

impl RegistryError {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::VersionNotFound { .. } => "version_not_found",
            Self::ShasumUnavailable { .. } => "shasum_unavailable",
            Self::KeyUnavailable { .. } => "key_unavailable",
            Self::UnsupportedAction { .. } => "unsupported_action",
        }
    }
}

impl From<SourceError> for RegistryError {
    fn from(source: SourceError) -> Self {
        Self::UpstreamUnavailable { source }
    }
}

impl From<IntegrityError> for RegistryError {
    fn from(source: IntegrityError) -> Self {
        Self::ShasumUnavailable { source }
    }
}

impl From<KeyError> for RegistryError {
    fn from(source: KeyError) -> Self {
        Self::KeyUnavailable { source }
    }
}
