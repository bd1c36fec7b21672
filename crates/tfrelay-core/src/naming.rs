//! Filename grammars for release assets and download request paths.
//!
//! Three prefix-anchored patterns are compiled once and shared by every
//! request:
//!
//! - checksums file: `<provider>_<version>_SHA256SUMS…`
//! - binary archive: `<provider>_<version>_<os>_<arch>…`
//! - download tail: `<version>/<action>/<os>/<arch>…`
//!
//! None of the patterns has to consume the whole input, so trailing text
//! such as a `.zip` extension is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Platform;

/// Word characters are ASCII only, matching the release tooling that
/// produces these names.
static CHECKSUM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<provider>[^_]+)_(?P<version>[^_]+)_SHA256SUMS")
        .expect("checksum grammar is a valid regex")
});

static BINARY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<provider>[^_]+)_(?P<version>[^_]+)_(?P<os>[0-9A-Za-z_]+)_(?P<arch>[0-9A-Za-z_]+)",
    )
    .expect("binary grammar is a valid regex")
});

static ACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<version>[^/]+)/(?P<action>[^/]+)/(?P<os>[^/]+)/(?P<arch>[0-9A-Za-z_]+)")
        .expect("action grammar is a valid regex")
});

/// A decoded `<version>/<action>/<os>/<arch>` request tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Requested version, free-form.
    pub version: String,
    /// Requested action; only `download` is served.
    pub action: String,
    /// Requested operating system.
    pub os: String,
    /// Requested architecture.
    pub arch: String,
}

/// Returns the version tag encoded in a checksums file name.
///
/// # Examples
///
/// ```
/// use tfrelay_core::naming::detect_checksum_asset;
///
/// assert_eq!(
///     detect_checksum_asset("terraform-provider-acme_1.2.0_SHA256SUMS"),
///     Some("1.2.0")
/// );
/// assert_eq!(detect_checksum_asset("terraform-provider-acme_1.2.0_linux_amd64.zip"), None);
/// ```
#[must_use]
pub fn detect_checksum_asset(name: &str) -> Option<&str> {
    CHECKSUM_PATTERN
        .captures(name)
        .and_then(|caps| caps.name("version"))
        .map(|m| m.as_str())
}

/// Returns the platform encoded in a binary archive name.
///
/// A checksums file name never matches, as it lacks the fourth
/// underscore-delimited segment.
#[must_use]
pub fn detect_binary_asset(name: &str) -> Option<Platform> {
    let caps = BINARY_PATTERN.captures(name)?;
    Some(Platform::new(&caps["os"], &caps["arch"]))
}

/// Decodes a download request tail.
///
/// Returns `None` when the tail has fewer than four slash-delimited
/// segments at its start.
#[must_use]
pub fn parse_action_request(tail: &str) -> Option<ActionRequest> {
    let caps = ACTION_PATTERN.captures(tail)?;
    Some(ActionRequest {
        version: caps["version"].to_string(),
        action: caps["action"].to_string(),
        os: caps["os"].to_string(),
        arch: caps["arch"].to_string(),
    })
}
