//! Signing key retrieval.
//!
//! The provider's signing key is published as an ASCII-armored OpenPGP
//! public key. The registry hands it to clients verbatim together with its
//! key ID, so only the armor and the leading packet are decoded.

use std::io::Read;

use pgp::armor::{BlockType, Dearmor};
use pgp::packet::{Packet, PacketParser};
use pgp::types::PublicKeyTrait;
use thiserror::Error;

use crate::source::{FetchError, HttpFetch};

/// Errors from [`fetch_public_key`] and [`parse_public_key`].
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key could not be retrieved.
    #[error("signing key unavailable: {source}")]
    Unavailable {
        /// Underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// The key URL answered with a non-success status.
    #[error("not found: signing key at {url} returned {status}")]
    NotFound {
        /// Key URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The release does not carry the signing key.
    #[error("not found: release has no {filename}")]
    Missing {
        /// Expected key file name.
        filename: String,
    },

    /// The key is not UTF-8 text.
    #[error("signing key is not text")]
    NotText,

    /// The armor could not be decoded.
    #[error("invalid armor: {message}")]
    Armor {
        /// Decoder message.
        message: String,
    },

    /// The armor or its first packet is not a public key.
    #[error("not a public key: found {found}")]
    NotAPublicKey {
        /// What was found instead.
        found: String,
    },

    /// The first packet could not be parsed.
    #[error("invalid key packet: {message}")]
    Packet {
        /// Parser message.
        message: String,
    },
}

/// A signing key as published, with its key ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    /// The armored key exactly as fetched.
    pub armor: String,
    /// Upper-case hex key ID.
    pub key_id: String,
}

/// Fetches and parses an armored public key.
///
/// # Errors
///
/// Returns [`KeyError::Unavailable`] when the request fails,
/// [`KeyError::NotFound`] on a non-success status, and the errors of
/// [`parse_public_key`] otherwise.
pub async fn fetch_public_key(fetcher: &dyn HttpFetch, url: &str) -> Result<SigningKey, KeyError> {
    let response = fetcher
        .get(url)
        .await
        .map_err(|source| KeyError::Unavailable { source })?;

    if !response.is_success() {
        return Err(KeyError::NotFound {
            url: url.to_string(),
            status: response.status,
        });
    }

    parse_public_key(response.body)
}

/// Parses an armored public key, keeping the original text.
///
/// The armor must declare `PGP PUBLIC KEY BLOCK` and its first packet must
/// be a public-key packet.
///
/// # Errors
///
/// Returns a [`KeyError`] describing the first check that fails.
pub fn parse_public_key(data: Vec<u8>) -> Result<SigningKey, KeyError> {
    let text = String::from_utf8(data).map_err(|_| KeyError::NotText)?;

    let mut dearmor = Dearmor::new(text.as_bytes());
    let mut body = Vec::new();
    dearmor
        .read_to_end(&mut body)
        .map_err(|e| KeyError::Armor {
            message: e.to_string(),
        })?;

    match dearmor.typ {
        Some(BlockType::PublicKey) => {}
        ref other => {
            return Err(KeyError::NotAPublicKey {
                found: other
                    .as_ref()
                    .map_or_else(|| "no armor".to_string(), |typ| format!("{typ:?} block")),
            })
        }
    }

    let first = PacketParser::new(body.as_slice())
        .next()
        .ok_or_else(|| KeyError::Packet {
            message: "armor body holds no packets".to_string(),
        })?
        .map_err(|e| KeyError::Packet {
            message: e.to_string(),
        })?;

    let Packet::PublicKey(key) = first else {
        return Err(KeyError::NotAPublicKey {
            found: packet_label(&first).to_string(),
        });
    };

    let key_id = hex::encode_upper(key.key_id());
    tracing::debug!(key_id = %key_id, algorithm = ?key.algorithm(), "Parsed signing key");
    Ok(SigningKey { armor: text, key_id })
}

fn packet_label(packet: &Packet) -> &'static str {
    match packet {
        Packet::PublicKey(_) => "public key packet",
        Packet::PublicSubkey(_) => "public subkey packet",
        Packet::SecretKey(_) | Packet::SecretSubkey(_) => "secret key packet",
        Packet::UserId(_) => "user id packet",
        Packet::Signature(_) => "signature packet",
        _ => "non-key packet",
    }
}
