//! # tfrelay core
//!
//! Resolution engine that serves GitHub releases of `terraform-provider-*`
//! repositories through the Terraform provider registry protocol.
//!
//! - [`naming`] decodes asset file names and request paths
//! - [`catalog`] turns releases into the protocol version list
//! - [`resolver`] matches a download request to its release and assets
//! - [`integrity`] looks up archive digests in `SHA256SUMS` files
//! - [`keys`] fetches the armored signing key and derives its key ID
//! - [`response`] holds the protocol response bodies
//!
//! Network access goes through the collaborator traits in [`source`].
//!
//! ## Example
//!
//! ```rust
//! use tfrelay_core::{build_catalog, Asset, Platform, Release};
//!
//! let release = Release::new(
//!     "v1.0.0",
//!     vec![
//!         Asset::new(1, "terraform-provider-acme_1.0.0_SHA256SUMS", "https://example.com/sums"),
//!         Asset::new(2, "terraform-provider-acme_1.0.0_linux_amd64.zip", "https://example.com/zip"),
//!     ],
//! );
//!
//! let catalog = build_catalog(&[release]);
//! assert_eq!(catalog[0].version, "1.0.0");
//! assert_eq!(catalog[0].platforms, vec![Platform::new("linux", "amd64")]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod integrity;
pub mod keys;
pub mod model;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod response;
pub mod source;


// Re-export main types at crate root
pub use catalog::build_catalog;
pub use error::{RegistryError, Result};
pub use integrity::{fetch_shasum, IntegrityError};
pub use keys::{fetch_public_key, KeyError, SigningKey};
pub use model::{Asset, Bundle, Platform, ProviderCoordinates, Release, VersionEntry};
pub use registry::ProviderRegistry;
pub use resolver::{AssetResolver, ExpectedAssets};
pub use response::{
    DownloadResponse, ErrorResponse, ProviderResponse, ServiceDiscovery, VersionsResponse,
};
pub use source::{
    AssetLocator, BrowserUrlLocator, FetchError, FetchResponse, HttpFetch, ReleaseSource,
    SourceError,
};
