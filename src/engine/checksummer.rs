//! engine::checksummer
//!
//! Deterministic content fingerprints.
//!
//! # Scheme
//!
//! Checksums are hex-encoded SHA-256 digests over a domain-separated byte
//! stream: every object kind hashes under its own tag, so a rule definition
//! that happens to equal an item's content still yields a distinct
//! checksum. Fields within one object are separated by NUL bytes, with
//! lengths included so adjacent fields cannot be confused.
//!
//! Equal inputs always yield equal checksums; the attribute maps are
//! key-ordered (`BTreeMap`), so their serialization is stable across runs.
//!
//! # Failure
//!
//! File-backed document content that cannot be read (source vanished
//! mid-run) is a [`ChecksumError`] — reported, never swallowed, because a
//! bad checksum causes incorrect incremental decisions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::collection::Identifiable;
use crate::core::config::Configuration;
use crate::core::document::{AttributeValue, Content, Document};
use crate::core::types::{Checksum, Identifier};

/// Errors from checksum calculation.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// A document's file-backed content could not be read.
    #[error("cannot read content of {identifier} from '{path}': {source}")]
    UnreadableContent {
        identifier: Identifier,
        path: PathBuf,
        source: std::io::Error,
    },

    /// An attribute map could not be serialized.
    ///
    /// Attribute values come from TOML, so this indicates a value that
    /// TOML cannot represent (e.g. a non-string-keyed table built
    /// programmatically).
    #[error("cannot serialize attributes of {identifier}: {message}")]
    UnserializableAttributes {
        identifier: Identifier,
        message: String,
    },
}

/// Computes stable fingerprints for checksum-able objects.
pub struct Checksummer;

impl Checksummer {
    /// Checksum of the full configuration attribute map.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::UnserializableAttributes`] if the attribute
    /// map cannot be serialized.
    pub fn calc_config(config: &Configuration) -> Result<Checksum, ChecksumError> {
        let attrs = serialize_attributes(config.attributes()).map_err(|message| {
            ChecksumError::UnserializableAttributes {
                identifier: config.identifier().clone(),
                message,
            }
        })?;

        let mut hasher = Sha256::new();
        hasher.update(b"config\0");
        update_field(&mut hasher, attrs.as_bytes());
        Ok(finish(hasher))
    }

    /// Checksum of a document: raw content bytes plus attributes.
    ///
    /// # Errors
    ///
    /// - [`ChecksumError::UnreadableContent`] if file-backed content
    ///   cannot be read
    /// - [`ChecksumError::UnserializableAttributes`] if the attribute map
    ///   cannot be serialized
    pub fn calc_document(document: &Document) -> Result<Checksum, ChecksumError> {
        let content = match document.content() {
            Content::Inline(text) => text.clone().into_bytes(),
            Content::File(path) => {
                std::fs::read(path).map_err(|e| ChecksumError::UnreadableContent {
                    identifier: document.identifier().clone(),
                    path: path.clone(),
                    source: e,
                })?
            }
        };

        let attrs = serialize_attributes(document.attributes()).map_err(|message| {
            ChecksumError::UnserializableAttributes {
                identifier: document.identifier().clone(),
                message,
            }
        })?;

        let mut hasher = Sha256::new();
        hasher.update(b"document\0");
        update_field(&mut hasher, &content);
        update_field(&mut hasher, attrs.as_bytes());
        Ok(finish(hasher))
    }

    /// Checksum of a compilation-rule definition.
    pub fn calc_rule(definition: &str) -> Checksum {
        let mut hasher = Sha256::new();
        hasher.update(b"rule\0");
        update_field(&mut hasher, definition.as_bytes());
        finish(hasher)
    }
}

/// Serialize a key-ordered attribute map to a stable TOML string.
fn serialize_attributes(attrs: &BTreeMap<String, AttributeValue>) -> Result<String, String> {
    if attrs.is_empty() {
        // toml::to_string of an empty map is fine, but short-circuiting
        // keeps "no attributes" distinct from any representable value.
        return Ok(String::new());
    }
    toml::to_string(attrs).map_err(|e| e.to_string())
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
    hasher.update(b"\0");
}

fn finish(hasher: Sha256) -> Checksum {
    let digest = hasher.finalize();
    Checksum::from_digest(hex::encode(digest))
}
