//! Download bundle resolution.
//!
//! Given a `<version>/<action>/<os>/<arch>` request, the resolver picks the
//! release that ships the version, locates its four conventionally named
//! assets, and enriches the result with the archive digest and the signing
//! key.
//!
//! Missing archive or signature assets leave their URL empty. A missing
//! checksums file or signing key fails the request.

use crate::error::{RegistryError, Result};
use crate::integrity::{self, IntegrityError};
use crate::keys::{self, KeyError};
use crate::model::{Bundle, ProviderCoordinates, Release};
use crate::naming::{detect_checksum_asset, parse_action_request, ActionRequest};
use crate::source::{AssetLocator, HttpFetch};

/// The only action the registry serves.
pub const DOWNLOAD_ACTION: &str = "download";

/// File name of the signing key, shared by every provider.
pub const SIGNING_KEY_FILENAME: &str = "signkey.asc";

/// File names a release is expected to carry for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedAssets {
    /// `{repo}_{version}_{os}_{arch}.zip`
    pub binary: String,
    /// `{repo}_{version}_SHA256SUMS`
    pub shasums: String,
    /// `{repo}_{version}_SHA256SUMS.sig`
    pub shasums_signature: String,
    /// `signkey.asc`
    pub signing_key: String,
}

impl ExpectedAssets {
    /// Builds the expected file names.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfrelay_core::resolver::ExpectedAssets;
    ///
    /// let expected = ExpectedAssets::new("terraform-provider-acme", "1.0.0", "linux", "amd64");
    /// assert_eq!(expected.binary, "terraform-provider-acme_1.0.0_linux_amd64.zip");
    /// assert_eq!(expected.shasums, "terraform-provider-acme_1.0.0_SHA256SUMS");
    /// ```
    #[must_use]
    pub fn new(repository: &str, version: &str, os: &str, arch: &str) -> Self {
        let shasums = format!("{repository}_{version}_SHA256SUMS");
        Self {
            binary: format!("{repository}_{version}_{os}_{arch}.zip"),
            shasums_signature: format!("{shasums}.sig"),
            shasums,
            signing_key: SIGNING_KEY_FILENAME.to_string(),
        }
    }
}

/// Download URLs found for the expected assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LocatedAssets {
    binary: Option<String>,
    shasums: Option<String>,
    shasums_signature: Option<String>,
    signing_key: Option<String>,
}

/// Returns the first release carrying a checksums file for `version`.
///
/// Releases are scanned in upstream order and the scan stops at the first
/// hit, so an earlier release shadows a later one that decodes to the same
/// version.
#[must_use]
pub fn select_release<'a>(releases: &'a [Release], version: &str) -> Option<&'a Release> {
    releases.iter().find(|release| {
        release
            .assets
            .iter()
            .any(|asset| detect_checksum_asset(&asset.name) == Some(version))
    })
}

/// Resolves download requests into [`Bundle`]s.
pub struct AssetResolver<'a> {
    locator: &'a dyn AssetLocator,
    fetcher: &'a dyn HttpFetch,
}

impl<'a> AssetResolver<'a> {
    /// Creates a resolver over the given collaborators.
    #[must_use]
    pub fn new(locator: &'a dyn AssetLocator, fetcher: &'a dyn HttpFetch) -> Self {
        Self { locator, fetcher }
    }

    /// Decodes `tail` and resolves it against `releases`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRequest`] when the tail does not
    /// decode, and the errors of [`Self::resolve_request`] otherwise.
    pub async fn resolve(
        &self,
        coordinates: &ProviderCoordinates,
        releases: &[Release],
        tail: &str,
    ) -> Result<Bundle> {
        let request = parse_action_request(tail).ok_or_else(|| RegistryError::InvalidRequest {
            tail: tail.to_string(),
        })?;
        self.resolve_request(coordinates, releases, &request).await
    }

    /// Resolves a decoded request against `releases`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::VersionNotFound`] when no release ships the version
    /// - [`RegistryError::ShasumUnavailable`] when the digest cannot be read
    /// - [`RegistryError::KeyUnavailable`] when the signing key cannot be read
    /// - [`RegistryError::UnsupportedAction`] when the action is not `download`
    pub async fn resolve_request(
        &self,
        coordinates: &ProviderCoordinates,
        releases: &[Release],
        request: &ActionRequest,
    ) -> Result<Bundle> {
        let release = select_release(releases, &request.version).ok_or_else(|| {
            RegistryError::VersionNotFound {
                version: request.version.clone(),
            }
        })?;

        let expected = ExpectedAssets::new(
            &coordinates.repository(),
            &request.version,
            &request.os,
            &request.arch,
        );
        let located = self.locate(coordinates, release, &expected).await;

        let shasums_url = located.shasums.ok_or_else(|| IntegrityError::NotFound {
            reason: format!("release has no {}", expected.shasums),
        })?;
        let shasum = integrity::fetch_shasum(self.fetcher, &expected.binary, &shasums_url).await?;

        let signing_key_url = located.signing_key.ok_or_else(|| KeyError::Missing {
            filename: expected.signing_key.clone(),
        })?;
        let signing_key = keys::fetch_public_key(self.fetcher, &signing_key_url).await?;

        if request.action != DOWNLOAD_ACTION {
            return Err(RegistryError::UnsupportedAction {
                action: request.action.clone(),
            });
        }

        tracing::info!(
            provider = %coordinates.id(),
            version = %request.version,
            os = %request.os,
            arch = %request.arch,
            key_id = %signing_key.key_id,
            "Resolved provider package"
        );

        Ok(Bundle {
            os: request.os.clone(),
            arch: request.arch.clone(),
            filename: expected.binary,
            download_url: located.binary.unwrap_or_default(),
            shasums_url,
            shasums_signature_url: located.shasums_signature.unwrap_or_default(),
            shasum,
            signing_key_id: signing_key.key_id,
            signing_key_armor: signing_key.armor,
        })
    }

    /// Resolves a download URL for each expected asset the release carries.
    ///
    /// A failed lookup leaves the URL unset.
    async fn locate(
        &self,
        coordinates: &ProviderCoordinates,
        release: &Release,
        expected: &ExpectedAssets,
    ) -> LocatedAssets {
        let repository = coordinates.repository();
        let mut located = LocatedAssets::default();

        for asset in &release.assets {
            let slot = if asset.name == expected.binary {
                &mut located.binary
            } else if asset.name == expected.shasums {
                &mut located.shasums
            } else if asset.name == expected.shasums_signature {
                &mut located.shasums_signature
            } else if asset.name == expected.signing_key {
                &mut located.signing_key
            } else {
                continue;
            };

            match self
                .locator
                .resolve_download_url(coordinates.owner(), &repository, asset)
                .await
            {
                Ok(url) => {
                    tracing::debug!(asset = %asset.name, "Located asset");
                    *slot = Some(url);
                }
                Err(e) => {
                    tracing::warn!(asset = %asset.name, error = %e, "Failed to locate asset");
                }
            }
        }

        located
    }
}
