//! Version catalog construction.

use crate::model::{Asset, Platform, Release, VersionEntry};
use crate::naming::{detect_binary_asset, detect_checksum_asset};

/// Builds the protocol version list from upstream releases.
///
/// Each release contributes at most one entry, keyed by the first asset
/// whose name decodes as a checksums file. Its platforms come from every
/// binary archive in the same release. Releases without a checksums file
/// are skipped. Order follows the upstream order; nothing is sorted or
/// deduplicated.
#[must_use]
pub fn build_catalog(releases: &[Release]) -> Vec<VersionEntry> {
    releases
        .iter()
        .filter_map(|release| {
            let version = release
                .assets
                .iter()
                .find_map(|asset| detect_checksum_asset(&asset.name))?;

            tracing::debug!(
                tag = %release.tag_name,
                version,
                "Catalogued release"
            );

            Some(VersionEntry {
                version: version.to_string(),
                platforms: collect_platforms(&release.assets),
            })
        })
        .collect()
}

/// Decodes the platform of every binary archive, in asset order.
#[must_use]
pub fn collect_platforms(assets: &[Asset]) -> Vec<Platform> {
    assets
        .iter()
        .filter_map(|asset| detect_binary_asset(&asset.name))
        .collect()
}
