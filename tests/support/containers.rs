//! Manifest container builders.

use ed25519_dalek::{Signer, SigningKey};
use release_channel::trust::{SIGNATURE_ENTRY, digest_listing};
use release_channel::{MANIFEST_RESOURCE_NAME, SignedContainerVerifier};
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Which key signs a built container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignedBy {
    /// The key trusted by [`trusted_verifier`].
    #[default]
    Publisher,
    /// A key nobody trusts.
    Stranger,
}

impl SignedBy {
    fn key(self) -> SigningKey {
        match self {
            Self::Publisher => SigningKey::from_bytes(&[21u8; 32]),
            Self::Stranger => SigningKey::from_bytes(&[42u8; 32]),
        }
    }
}

/// Verifier trusting only [`SignedBy::Publisher`].
pub fn trusted_verifier() -> SignedContainerVerifier {
    SignedContainerVerifier::new(vec![SignedBy::Publisher.key().verifying_key()])
}

/// Manifest JSON with the two required versions.
pub fn manifest_json(current: &str, minimum: &str) -> String {
    format!(r#"{{"current-version":"{current}","production-minimum-version":"{minimum}"}}"#)
}

/// Encode `text` as UTF-16LE, optionally with the byte-order mark.
pub fn utf16le(text: &str, with_bom: bool) -> Vec<u8> {
    let mut bytes = if with_bom { vec![0xFF, 0xFE] } else { Vec::new() };
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    bytes
}

/// Build a signed container holding `resource` at the manifest name.
pub fn signed_container(resource: &[u8], signed_by: SignedBy) -> Vec<u8> {
    let listing = digest_listing(vec![(
        MANIFEST_RESOURCE_NAME.to_owned(),
        hex::encode(Sha256::digest(resource)),
    )]);
    let signature = signed_by.key().sign(listing.as_bytes());

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(MANIFEST_RESOURCE_NAME, SimpleFileOptions::default())
        .expect("start manifest entry");
    writer.write_all(resource).expect("write manifest entry");
    writer
        .start_file(SIGNATURE_ENTRY, SimpleFileOptions::default())
        .expect("start signature entry");
    writer
        .write_all(hex::encode(signature.to_bytes()).as_bytes())
        .expect("write signature entry");
    writer.finish().expect("finish container").into_inner()
}
