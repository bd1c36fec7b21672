//! Registry protocol response bodies.

use serde::{Deserialize, Serialize};

use crate::model::{Bundle, ProviderCoordinates, VersionEntry};

/// Path the provider protocol is served under.
pub const PROVIDERS_PATH: &str = "/v1/providers/";

/// Body of `GET /.well-known/terraform.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDiscovery {
    /// Base URL of the provider registry protocol.
    #[serde(rename = "providers.v1")]
    pub providers: String,
}

impl ServiceDiscovery {
    /// Advertises the provider protocol under `base_url`.
    ///
    /// An empty base yields the relative `/v1/providers/`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            providers: format!("{}{PROVIDERS_PATH}", base_url.trim_end_matches('/')),
        }
    }
}

/// Body of the "list available versions" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsResponse {
    /// `{namespace}/{type}`.
    pub id: String,
    /// Catalogued versions.
    pub versions: Vec<VersionEntry>,
    /// Always `null`.
    pub warnings: Option<Vec<String>>,
}

impl VersionsResponse {
    /// Assembles the response for `coordinates`.
    #[must_use]
    pub fn new(coordinates: &ProviderCoordinates, versions: Vec<VersionEntry>) -> Self {
        Self {
            id: coordinates.id(),
            versions,
            warnings: None,
        }
    }
}

/// A GPG key entry of a download response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpgPublicKey {
    /// Upper-case hex key ID.
    pub key_id: String,
    /// Armored public key.
    pub ascii_armor: String,
    /// Always empty.
    pub trust_signature: String,
    /// Always empty.
    pub source: String,
    /// Always `null`.
    pub source_url: Option<String>,
}

/// Signing keys of a download response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKeys {
    /// GPG public keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gpg_public_keys: Vec<GpgPublicKey>,
}

/// Body of the "find a provider package" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
    /// Archive file name.
    pub filename: String,
    /// Archive URL.
    pub download_url: String,
    /// Checksums file URL.
    pub shasums_url: String,
    /// Checksums signature URL.
    pub shasums_signature_url: String,
    /// Archive digest.
    pub shasum: String,
    /// Keys that may have signed the checksums.
    pub signing_keys: SigningKeys,
}

impl From<Bundle> for DownloadResponse {
    fn from(bundle: Bundle) -> Self {
        Self {
            os: bundle.os,
            arch: bundle.arch,
            filename: bundle.filename,
            download_url: bundle.download_url,
            shasums_url: bundle.shasums_url,
            shasums_signature_url: bundle.shasums_signature_url,
            shasum: bundle.shasum,
            signing_keys: SigningKeys {
                gpg_public_keys: vec![GpgPublicKey {
                    key_id: bundle.signing_key_id,
                    ascii_armor: bundle.signing_key_armor,
                    trust_signature: String::new(),
                    source: String::new(),
                    source_url: None,
                }],
            },
        }
    }
}

/// Either protocol response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    /// Version listing.
    Versions(VersionsResponse),
    /// Package download descriptor.
    Download(DownloadResponse),
}

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Error message.
    pub message: String,
}
