//! Checksum lookup in `SHA256SUMS` manifests.

use thiserror::Error;

use crate::source::{FetchError, HttpFetch};

/// Separator between digest and file name in a checksums line.
const SEPARATOR: &str = "  ";

/// Errors from [`fetch_shasum`].
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The checksums file could not be retrieved.
    #[error("checksums file unavailable: {source}")]
    Unavailable {
        /// Underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// The checksums file is missing or has no entry for the file.
    #[error("not found: {reason}")]
    NotFound {
        /// What was missing.
        reason: String,
    },
}

/// Fetches a checksums file and returns the digest listed for `filename`.
///
/// # Errors
///
/// Returns [`IntegrityError::Unavailable`] when the request fails and
/// [`IntegrityError::NotFound`] on a non-success status or when no line
/// lists `filename`.
pub async fn fetch_shasum(
    fetcher: &dyn HttpFetch,
    filename: &str,
    url: &str,
) -> Result<String, IntegrityError> {
    let response = fetcher
        .get(url)
        .await
        .map_err(|source| IntegrityError::Unavailable { source })?;

    if !response.is_success() {
        return Err(IntegrityError::NotFound {
            reason: format!("checksums file at {url} returned {}", response.status),
        });
    }

    let text = String::from_utf8_lossy(&response.body);
    find_digest(&text, filename)
        .map(ToString::to_string)
        .ok_or_else(|| IntegrityError::NotFound {
            reason: format!("no checksum listed for {filename}"),
        })
}

/// Returns the digest of the first `<digest>  <filename>` line naming
/// `filename`.
///
/// Lines must split into exactly two fields on a two-space separator; a
/// single space never matches.
#[must_use]
pub fn find_digest<'a>(manifest: &'a str, filename: &str) -> Option<&'a str> {
    manifest.lines().find_map(|line| {
        let mut fields = line.split(SEPARATOR);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(digest), Some(name), None) if name == filename => Some(digest),
            _ => None,
        }
    })
}
