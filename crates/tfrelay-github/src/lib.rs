//! # tfrelay GitHub
//!
//! GitHub-backed collaborators for the tfrelay resolution engine.
//!
//! - [`GithubClient`] lists repository releases and resolves asset download
//!   URLs. With a token it hands out short-lived signed URLs, so private
//!   repositories can be served; without one it uses the public browser
//!   download URL.
//! - [`HttpFetcher`] downloads checksum files and signing keys.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tfrelay_core::ProviderRegistry;
//! use tfrelay_github::{GithubClient, GithubConfig, HttpFetcher};
//!
//! # fn main() -> Result<(), tfrelay_github::GithubError> {
//! let config = GithubConfig::new().with_token("ghp_example");
//! let fetcher = HttpFetcher::new(config.timeout, &config.user_agent)?;
//! let github = Arc::new(GithubClient::new(config)?);
//!
//! let registry = ProviderRegistry::new(github.clone(), github, Arc::new(fetcher));
//! # let _ = registry;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

mod client;
mod config;
mod error;
mod fetch;

#[cfg(test)]
mod test_server;

pub use client::{GithubClient, GITHUB_JSON, OCTET_STREAM};
pub use config::{GithubConfig, DEFAULT_API_URL};
pub use error::GithubError;
pub use fetch::HttpFetcher;
