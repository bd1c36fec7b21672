//! Domain model shared by the resolution engine.
//!
//! Releases and assets mirror the subset of the GitHub releases API that
//! the engine reads. They are fetched per request and never persisted.

use serde::{Deserialize, Serialize};

/// Prefix GitHub repositories carry in front of the provider type.
pub const PROVIDER_REPOSITORY_PREFIX: &str = "terraform-provider-";

/// A file attached to a [`Release`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque upstream handle, used to request signed download URLs.
    pub id: u64,

    /// File name, e.g. `terraform-provider-acme_1.0.0_linux_amd64.zip`.
    pub name: String,

    /// Public download URL.
    pub browser_download_url: String,
}

impl Asset {
    /// Creates an asset.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, browser_download_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            browser_download_url: browser_download_url.into(),
        }
    }
}

/// A tagged set of downloadable files published against a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Git tag the release was cut from.
    #[serde(default)]
    pub tag_name: String,

    /// Attached files, in upstream order.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Creates a release from its tag and assets.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, assets: Vec<Asset>) -> Self {
        Self {
            tag_name: tag_name.into(),
            assets,
        }
    }
}

/// An operating system and architecture pair a provider binary targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system, e.g. `linux`.
    pub os: String,

    /// Architecture, e.g. `amd64`.
    pub arch: String,
}

impl Platform {
    /// Creates a platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

/// One published provider version and the platforms it ships for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Version tag decoded from the release's checksums file name.
    pub version: String,

    /// Platforms decoded from the release's binary archives.
    pub platforms: Vec<Platform>,
}

/// Everything a client needs to download and verify one provider package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    /// Requested operating system.
    pub os: String,
    /// Requested architecture.
    pub arch: String,
    /// Archive file name.
    pub filename: String,
    /// Archive URL, empty when the release does not carry the archive.
    pub download_url: String,
    /// Checksums file URL.
    pub shasums_url: String,
    /// Detached checksums signature URL, empty when absent.
    pub shasums_signature_url: String,
    /// Hex digest of the archive taken from the checksums file.
    pub shasum: String,
    /// Upper-case hex key ID of the signing key.
    pub signing_key_id: String,
    /// Signing key exactly as published.
    pub signing_key_armor: String,
}

/// Typed identity of the provider a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCoordinates {
    /// Registry namespace, which is also the GitHub owner.
    pub namespace: String,

    /// Provider type, e.g. `acme` for `terraform-provider-acme`.
    pub provider_type: String,
}

impl ProviderCoordinates {
    /// Creates coordinates from the namespace and provider type.
    #[must_use]
    pub fn new(namespace: impl Into<String>, provider_type: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            provider_type: provider_type.into(),
        }
    }

    /// Returns the GitHub owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.namespace
    }

    /// Returns the GitHub repository name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfrelay_core::ProviderCoordinates;
    ///
    /// let coords = ProviderCoordinates::new("acme-corp", "acme");
    /// assert_eq!(coords.repository(), "terraform-provider-acme");
    /// ```
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{PROVIDER_REPOSITORY_PREFIX}{}", self.provider_type)
    }

    /// Returns the registry ID, `{namespace}/{type}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.namespace, self.provider_type)
    }
}
