//! Sealing manifests into signed containers.
//!
//! The publishing side of [`SignedContainerVerifier`]: takes manifest JSON,
//! stores it as UTF-16LE at the well-known resource name and signs the
//! digest listing with an Ed25519 key.
//!
//! [`SignedContainerVerifier`]: crate::trust::SignedContainerVerifier

use crate::decoder::MANIFEST_RESOURCE_NAME;
use crate::keys::{KeyError, parse_signing_key};
use crate::text::encode_resource_text;
use crate::trust::{SIGNATURE_ENTRY, digest_listing};
use ed25519_dalek::{Signer, SigningKey};
use log::debug;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;

/// Errors raised while sealing a manifest container.
#[derive(Debug, Error)]
pub enum SealError {
    /// Writing the container failed.
    #[error("I/O error while sealing: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP writer rejected an entry.
    #[error("archive error while sealing: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The signing key could not be parsed.
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] KeyError),

    /// The manifest text is blank.
    #[error("manifest is empty")]
    EmptyManifest,
}

/// Seal `release_json` into a signed manifest container.
///
/// The JSON is stored verbatim; its schema is not checked here so that
/// publishers can exercise the decoder's rejection paths.
///
/// # Errors
///
/// Returns [`SealError::EmptyManifest`] for blank input and
/// [`SealError::Zip`] or [`SealError::Io`] when the archive cannot be built.
pub fn seal_container(release_json: &str, signing_key: &SigningKey) -> Result<Vec<u8>, SealError> {
    if release_json.trim().is_empty() {
        return Err(SealError::EmptyManifest);
    }

    let resource = encode_resource_text(release_json);
    let digest = hex::encode(Sha256::digest(&resource));
    let listing = digest_listing(vec![(MANIFEST_RESOURCE_NAME.to_owned(), digest)]);
    let signature = signing_key.sign(listing.as_bytes());

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(MANIFEST_RESOURCE_NAME, SimpleFileOptions::default())?;
    writer.write_all(&resource)?;
    writer.start_file(SIGNATURE_ENTRY, SimpleFileOptions::default())?;
    writer.write_all(hex::encode(signature.to_bytes()).as_bytes())?;
    let container = writer.finish()?.into_inner();

    debug!(
        target: "release_channel::seal",
        "sealed {} byte manifest into {} byte container",
        release_json.len(),
        container.len()
    );
    Ok(container)
}

/// Parse a hex-encoded Ed25519 secret key seed for sealing.
///
/// # Errors
///
/// Returns [`SealError::InvalidKey`] when the value is not 32 bytes of hex.
pub fn signing_key_from_hex(value: &str) -> Result<SigningKey, SealError> {
    Ok(parse_signing_key(value)?)
}
