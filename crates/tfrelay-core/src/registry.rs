//! Request-scoped entry point tying the engine to its collaborators.

use std::sync::Arc;

use crate::catalog::build_catalog;
use crate::error::Result;
use crate::model::{ProviderCoordinates, Release};
use crate::resolver::AssetResolver;
use crate::response::{DownloadResponse, ProviderResponse, VersionsResponse};
use crate::source::{AssetLocator, HttpFetch, ReleaseSource};

/// Path tail of the "list available versions" endpoint.
pub const VERSIONS_TAIL: &str = "versions";

/// Answers provider protocol requests from upstream releases.
///
/// Holds no per-request state: every call lists releases afresh and runs
/// its upstream requests one after another.
#[derive(Clone)]
pub struct ProviderRegistry {
    source: Arc<dyn ReleaseSource>,
    locator: Arc<dyn AssetLocator>,
    fetcher: Arc<dyn HttpFetch>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry").finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    /// Creates a registry over the given collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        locator: Arc<dyn AssetLocator>,
        fetcher: Arc<dyn HttpFetch>,
    ) -> Self {
        Self {
            source,
            locator,
            fetcher,
        }
    }

    /// Answers a request for `coordinates` with path tail `tail`.
    ///
    /// The tail `versions` lists versions; anything else is treated as a
    /// download request.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::RegistryError`] when releases cannot be listed or
    /// the download request cannot be resolved.
    pub async fn handle(
        &self,
        coordinates: &ProviderCoordinates,
        tail: &str,
    ) -> Result<ProviderResponse> {
        if tail == VERSIONS_TAIL {
            return self
                .versions(coordinates)
                .await
                .map(ProviderResponse::Versions);
        }

        self.download(coordinates, tail)
            .await
            .map(ProviderResponse::Download)
    }

    /// Lists the versions published for `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::UpstreamUnavailable`] when releases
    /// cannot be listed.
    pub async fn versions(&self, coordinates: &ProviderCoordinates) -> Result<VersionsResponse> {
        let releases = self.releases(coordinates).await?;
        Ok(VersionsResponse::new(coordinates, build_catalog(&releases)))
    }

    /// Resolves the download request encoded in `tail`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::RegistryError`] when releases cannot be listed or
    /// the request cannot be resolved.
    pub async fn download(
        &self,
        coordinates: &ProviderCoordinates,
        tail: &str,
    ) -> Result<DownloadResponse> {
        let releases = self.releases(coordinates).await?;
        let resolver = AssetResolver::new(self.locator.as_ref(), self.fetcher.as_ref());
        let bundle = resolver.resolve(coordinates, &releases, tail).await?;
        Ok(DownloadResponse::from(bundle))
    }

    async fn releases(&self, coordinates: &ProviderCoordinates) -> Result<Vec<Release>> {
        let repository = coordinates.repository();
        let releases = self
            .source
            .list_releases(coordinates.owner(), &repository)
            .await?;

        tracing::debug!(
            owner = %coordinates.owner(),
            repository = %repository,
            count = releases.len(),
            "Listed releases"
        );
        Ok(releases)
    }
}
