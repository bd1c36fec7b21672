//! End-to-end resolution tests against in-memory collaborators.
//!
//! Signing keys under `fixtures/` were exported with gpg; their key IDs are
//! asserted below.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tfrelay_core::{
    Asset, AssetLocator, BrowserUrlLocator, FetchError, FetchResponse, HttpFetch, IntegrityError,
    KeyError, Platform, ProviderCoordinates, ProviderRegistry, ProviderResponse, RegistryError,
    Release, ReleaseSource, SourceError,
};

const ED25519_KEY: &str = include_str!("fixtures/signkey-ed25519.asc");
const ED25519_KEY_ID: &str = "2AD85CE395AB1237";
const RSA_KEY: &str = include_str!("fixtures/signkey-rsa.asc");
const RSA_KEY_ID: &str = "240852B51F532E5E";
const PGP_MESSAGE: &str = include_str!("fixtures/message.asc");

const REPO: &str = "terraform-provider-acme";
const BASE: &str = "https://downloads.example.com";

// =============================================================================
// Fakes
// =============================================================================

struct StaticReleases(Result<Vec<Release>, u16>);

#[async_trait]
impl ReleaseSource for StaticReleases {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, SourceError> {
        assert_eq!(repo, REPO);
        match &self.0 {
            Ok(releases) => Ok(releases.clone()),
            Err(404) => Err(SourceError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            Err(status) => Err(SourceError::Http {
                status: *status,
                message: "upstream failure".to_string(),
            }),
        }
    }
}

/// Serves fixed bodies by URL and records every request.
#[derive(Default)]
struct StaticWeb {
    pages: HashMap<String, FetchResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticWeb {
    fn page(mut self, name: &str, status: u16, body: &str) -> Self {
        self.pages
            .insert(url(name), FetchResponse::new(status, body.as_bytes().to_vec()));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for StaticWeb {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Fails for one asset name, hands out browser URLs otherwise.
struct FlakyLocator {
    failing: &'static str,
}

#[async_trait]
impl AssetLocator for FlakyLocator {
    async fn resolve_download_url(
        &self,
        owner: &str,
        repo: &str,
        asset: &Asset,
    ) -> Result<String, SourceError> {
        if asset.name == self.failing {
            return Err(SourceError::Http {
                status: 500,
                message: "asset lookup failed".to_string(),
            });
        }
        BrowserUrlLocator
            .resolve_download_url(owner, repo, asset)
            .await
    }
}

fn url(name: &str) -> String {
    format!("{BASE}/{name}")
}

fn release(tag: &str, names: &[&str]) -> Release {
    let assets = names
        .iter()
        .enumerate()
        .map(|(i, name)| Asset::new(i as u64 + 1, *name, url(name)))
        .collect();
    Release::new(tag, assets)
}

fn full_release(version: &str) -> Release {
    release(
        &format!("v{version}"),
        &[
            &format!("{REPO}_{version}_SHA256SUMS"),
            &format!("{REPO}_{version}_SHA256SUMS.sig"),
            &format!("{REPO}_{version}_linux_amd64.zip"),
            &format!("{REPO}_{version}_darwin_arm64.zip"),
            "signkey.asc",
        ],
    )
}

fn shasums(version: &str) -> String {
    format!(
        "deadbeef  {REPO}_{version}_linux_amd64.zip\ncafebabe  {REPO}_{version}_darwin_arm64.zip\n"
    )
}

fn coordinates() -> ProviderCoordinates {
    ProviderCoordinates::new("acme-corp", "acme")
}

fn registry(
    releases: Vec<Release>,
    web: Arc<StaticWeb>,
    locator: Arc<dyn AssetLocator>,
) -> ProviderRegistry {
    ProviderRegistry::new(Arc::new(StaticReleases(Ok(releases))), locator, web)
}

fn default_web() -> StaticWeb {
    StaticWeb::default()
        .page(&format!("{REPO}_1.0.0_SHA256SUMS"), 200, &shasums("1.0.0"))
        .page("signkey.asc", 200, ED25519_KEY)
}

// =============================================================================
// Versions
// =============================================================================

#[tokio::test]
async fn test_versions_lists_catalog() {
    let releases = vec![release(
        "v1.0.0",
        &["acme_1.0.0_SHA256SUMS", "acme_1.0.0_linux_amd64.zip"],
    )];
    let registry = registry(releases, Arc::new(StaticWeb::default()), Arc::new(BrowserUrlLocator));

    let response = registry.versions(&coordinates()).await.unwrap();
    assert_eq!(response.id, "acme-corp/acme");
    assert_eq!(response.versions.len(), 1);
    assert_eq!(response.versions[0].version, "1.0.0");
    assert_eq!(
        response.versions[0].platforms,
        vec![Platform::new("linux", "amd64")]
    );
    assert!(response.warnings.is_none());
}

#[tokio::test]
async fn test_handle_dispatches_versions_tail() {
    let registry = registry(
        vec![full_release("1.0.0"), full_release("0.9.0")],
        Arc::new(StaticWeb::default()),
        Arc::new(BrowserUrlLocator),
    );

    let response = registry.handle(&coordinates(), "versions").await.unwrap();
    let ProviderResponse::Versions(versions) = response else {
        panic!("Expected versions response");
    };
    let listed: Vec<_> = versions.versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(listed, vec!["1.0.0", "0.9.0"]);
    assert_eq!(versions.versions[0].platforms.len(), 2);
}

#[tokio::test]
async fn test_handle_matches_direct_entry_points() {
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(BrowserUrlLocator),
    );
    let coordinates = coordinates();

    assert_eq!(
        registry.handle(&coordinates, "versions").await.unwrap(),
        ProviderResponse::Versions(registry.versions(&coordinates).await.unwrap())
    );
    assert_eq!(
        registry
            .handle(&coordinates, "1.0.0/download/linux/amd64")
            .await
            .unwrap(),
        ProviderResponse::Download(
            registry
                .download(&coordinates, "1.0.0/download/linux/amd64")
                .await
                .unwrap()
        )
    );
}

#[tokio::test]
async fn test_upstream_failure() {
    let registry = ProviderRegistry::new(
        Arc::new(StaticReleases(Err(404))),
        Arc::new(BrowserUrlLocator),
        Arc::new(StaticWeb::default()),
    );

    let err = registry.handle(&coordinates(), "versions").await.unwrap_err();
    assert!(matches!(err, RegistryError::UpstreamUnavailable { .. }));
    assert_eq!(
        err.to_string(),
        "repository acme-corp/terraform-provider-acme not found"
    );
}

// =============================================================================
// Downloads
// =============================================================================

#[tokio::test]
async fn test_download_bundle() {
    let web = Arc::new(default_web());
    let registry = registry(
        vec![full_release("1.0.0")],
        web.clone(),
        Arc::new(BrowserUrlLocator),
    );

    let response = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap();

    assert_eq!(response.os, "linux");
    assert_eq!(response.arch, "amd64");
    assert_eq!(response.filename, "terraform-provider-acme_1.0.0_linux_amd64.zip");
    assert_eq!(response.download_url, url("terraform-provider-acme_1.0.0_linux_amd64.zip"));
    assert_eq!(response.shasums_url, url("terraform-provider-acme_1.0.0_SHA256SUMS"));
    assert_eq!(
        response.shasums_signature_url,
        url("terraform-provider-acme_1.0.0_SHA256SUMS.sig")
    );
    assert_eq!(response.shasum, "deadbeef");

    let keys = &response.signing_keys.gpg_public_keys;
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].key_id, ED25519_KEY_ID);
    assert_eq!(keys[0].ascii_armor, ED25519_KEY);

    // One checksum fetch, one key fetch, nothing else.
    assert_eq!(web.requested().len(), 2);
}

#[tokio::test]
async fn test_download_rsa_signing_key() {
    let web = StaticWeb::default()
        .page(&format!("{REPO}_1.0.0_SHA256SUMS"), 200, &shasums("1.0.0"))
        .page("signkey.asc", 200, RSA_KEY);
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(web),
        Arc::new(BrowserUrlLocator),
    );

    let response = registry
        .download(&coordinates(), "1.0.0/download/darwin/arm64")
        .await
        .unwrap();
    assert_eq!(response.shasum, "cafebabe");
    assert_eq!(response.signing_keys.gpg_public_keys[0].key_id, RSA_KEY_ID);
}

#[tokio::test]
async fn test_download_through_handle() {
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(BrowserUrlLocator),
    );

    let response = registry
        .handle(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap();
    assert!(matches!(response, ProviderResponse::Download(_)));
}

#[tokio::test]
async fn test_invalid_request() {
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry.download(&coordinates(), "versions").await.unwrap_err();
    assert!(matches!(err, RegistryError::InvalidRequest { .. }));
    assert_eq!(err.to_string(), "invalid request");

    let err = registry
        .handle(&coordinates(), "1.0.0/download")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_version_not_found() {
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "2.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::VersionNotFound { ref version } if version == "2.0.0"));
    assert_eq!(err.to_string(), "cannot find version: 2.0.0");
}

#[tokio::test]
async fn test_shasum_missing_for_existing_binary() {
    let web = StaticWeb::default()
        .page(
            &format!("{REPO}_1.0.0_SHA256SUMS"),
            200,
            &format!("deadbeef  {REPO}_1.0.0_windows_amd64.zip\n"),
        )
        .page("signkey.asc", 200, ED25519_KEY);
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(web),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::ShasumUnavailable {
            source: IntegrityError::NotFound { .. }
        }
    ));
    assert!(err.to_string().starts_with("failed getting shasum"));
}

#[tokio::test]
async fn test_shasum_single_space_line_is_not_found() {
    let web = StaticWeb::default()
        .page(
            &format!("{REPO}_1.0.0_SHA256SUMS"),
            200,
            &format!("deadbeef {REPO}_1.0.0_linux_amd64.zip\n"),
        )
        .page("signkey.asc", 200, ED25519_KEY);
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(web),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ShasumUnavailable { .. }));
}

#[tokio::test]
async fn test_release_without_checksums_asset_url() {
    // The checksums asset exists but its locator fails.
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(FlakyLocator {
            failing: "terraform-provider-acme_1.0.0_SHA256SUMS",
        }),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ShasumUnavailable { .. }));
}

#[tokio::test]
async fn test_signing_key_is_a_message() {
    let web = StaticWeb::default()
        .page(&format!("{REPO}_1.0.0_SHA256SUMS"), 200, &shasums("1.0.0"))
        .page("signkey.asc", 200, PGP_MESSAGE);
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(web),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::KeyUnavailable {
            source: KeyError::NotAPublicKey { .. }
        }
    ));
    assert!(err.to_string().starts_with("failed getting pgp keys"));
}

#[tokio::test]
async fn test_signing_key_not_found() {
    let web = StaticWeb::default()
        .page(&format!("{REPO}_1.0.0_SHA256SUMS"), 200, &shasums("1.0.0"))
        .page("signkey.asc", 404, "");
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(web),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::KeyUnavailable {
            source: KeyError::NotFound { status: 404, .. }
        }
    ));
}

#[tokio::test]
async fn test_release_without_signing_key() {
    let releases = vec![release(
        "v1.0.0",
        &[
            "terraform-provider-acme_1.0.0_SHA256SUMS",
            "terraform-provider-acme_1.0.0_linux_amd64.zip",
        ],
    )];
    let registry = registry(releases, Arc::new(default_web()), Arc::new(BrowserUrlLocator));

    let err = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::KeyUnavailable {
            source: KeyError::Missing { .. }
        }
    ));
}

#[tokio::test]
async fn test_missing_optional_assets_leave_empty_urls() {
    // No archive for the platform and no detached signature.
    let releases = vec![release(
        "v1.0.0",
        &["terraform-provider-acme_1.0.0_SHA256SUMS", "signkey.asc"],
    )];
    let registry = registry(releases, Arc::new(default_web()), Arc::new(BrowserUrlLocator));

    let response = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap();
    assert_eq!(response.download_url, "");
    assert_eq!(response.shasums_signature_url, "");
    assert_eq!(response.shasum, "deadbeef");
}

#[tokio::test]
async fn test_failed_optional_locator_degrades() {
    let registry = registry(
        vec![full_release("1.0.0")],
        Arc::new(default_web()),
        Arc::new(FlakyLocator {
            failing: "terraform-provider-acme_1.0.0_linux_amd64.zip",
        }),
    );

    let response = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap();
    assert_eq!(response.download_url, "");
    assert_eq!(response.shasum, "deadbeef");
}

#[tokio::test]
async fn test_unsupported_action_checked_after_enrichment() {
    let web = Arc::new(default_web());
    let registry = registry(
        vec![full_release("1.0.0")],
        web.clone(),
        Arc::new(BrowserUrlLocator),
    );

    let err = registry
        .download(&coordinates(), "1.0.0/upload/linux/amd64")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnsupportedAction { ref action } if action == "upload"));
    assert_eq!(err.to_string(), "unsupported action upload");
    assert_eq!(web.requested().len(), 2);
}

#[tokio::test]
async fn test_earliest_release_wins_for_duplicate_version() {
    let mut shadowed = full_release("1.0.0");
    shadowed.tag_name = "v1.0.0-rebuild".to_string();
    for asset in &mut shadowed.assets {
        asset.browser_download_url = format!("{BASE}/rebuild/{}", asset.name);
    }

    let registry = registry(
        vec![full_release("1.0.0"), shadowed],
        Arc::new(default_web()),
        Arc::new(BrowserUrlLocator),
    );

    let response = registry
        .download(&coordinates(), "1.0.0/download/linux/amd64")
        .await
        .unwrap();
    assert_eq!(response.shasums_url, url("terraform-provider-acme_1.0.0_SHA256SUMS"));
}
