//! Trust verification for manifest containers.
//!
//! The [`TrustGate`] is the fail-closed front door of the decode pipeline:
//! nothing is extracted from a stream until its [`TrustVerifier`] says the
//! stream is trusted. A verifier that cannot reach a verdict (unreadable
//! container, missing signature, I/O failure) answers "not trusted".
//!
//! [`SignedContainerVerifier`] is the default verifier. It checks a detached
//! Ed25519 signature stored inside the ZIP container at
//! [`SIGNATURE_ENTRY`]. The signed message is the digest listing of every
//! other file entry (see [`digest_listing`]).

use crate::error::{ChannelInfoError, Result};
use crate::keys::{KeyError, parse_verifying_key};
use crate::stream::ReadSeek;
use ed25519_dalek::{SIGNATURE_LENGTH, Signature, VerifyingKey};
use log::debug;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Container entry holding the hex-encoded signature.
pub const SIGNATURE_ENTRY: &str = "META-INF/SIGNATURE";

/// Largest signature entry the verifier will read.
const MAX_SIGNATURE_BYTES: u64 = 1024;

/// Largest single entry the verifier will hash.
const MAX_ENTRY_BYTES: u64 = 1024 * 1024;

/// Total uncompressed bytes the verifier will hash across all entries.
const MAX_HASHED_BYTES: u64 = 4 * 1024 * 1024;

/// A predicate deciding whether a container stream is authentic.
///
/// Implementations may consume stream position; callers rewind afterwards.
/// Any closure `Fn(&mut dyn ReadSeek) -> bool` is a verifier, which keeps
/// test doubles trivial.
///
/// # Examples
///
/// ```
/// use release_channel::stream::ReadSeek;
/// use release_channel::trust::TrustVerifier;
/// use std::io::Cursor;
///
/// let reject_all = |_: &mut dyn ReadSeek| false;
/// assert!(!reject_all.is_trusted(&mut Cursor::new(Vec::new())));
/// ```
pub trait TrustVerifier {
    /// Return whether `stream` is trusted.
    fn is_trusted(&self, stream: &mut dyn ReadSeek) -> bool;
}

impl<F> TrustVerifier for F
where
    F: Fn(&mut dyn ReadSeek) -> bool,
{
    fn is_trusted(&self, stream: &mut dyn ReadSeek) -> bool {
        self(stream)
    }
}

/// Fail-closed gate in front of manifest extraction.
pub struct TrustGate<'a> {
    verifier: &'a dyn TrustVerifier,
}

impl<'a> TrustGate<'a> {
    /// Wrap `verifier` in a gate.
    #[must_use]
    pub const fn new(verifier: &'a dyn TrustVerifier) -> Self {
        Self { verifier }
    }

    /// Ask the verifier about `stream`.
    ///
    /// A verifier that panics has reached no verdict, so the stream is not
    /// trusted.
    #[must_use]
    pub fn verify(&self, stream: &mut dyn ReadSeek) -> bool {
        let verdict = catch_unwind(AssertUnwindSafe(|| self.verifier.is_trusted(stream)));
        let trusted = verdict.unwrap_or_else(|_| {
            debug!(target: "release_channel::trust", "trust verifier panicked");
            false
        });
        debug!(target: "release_channel::trust", "trust verdict: {trusted}");
        trusted
    }

    /// Admit `stream` downstream: verify it, then rewind it to the start.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelInfoError::UntrustedManifest`] when verification
    /// fails and [`ChannelInfoError::Io`] when the stream cannot be rewound.
    pub fn admit(&self, stream: &mut dyn ReadSeek) -> Result<()> {
        if !self.verify(stream) {
            return Err(ChannelInfoError::UntrustedManifest);
        }
        stream.rewind()?;
        Ok(())
    }
}

/// Reasons a signed container fails verification.
///
/// Not exported: the verifier only ever answers yes or no, and these are
/// logged for diagnosis.
#[derive(Debug, thiserror::Error)]
enum VerificationFailure {
    #[error("no trusted keys configured")]
    NoTrustedKeys,

    #[error("container unreadable: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("I/O error reading container: {0}")]
    Io(#[from] std::io::Error),

    #[error("container has no META-INF/SIGNATURE entry")]
    MissingSignature,

    #[error("entry \"{name}\" exceeds the {limit} byte hashing limit")]
    OversizedEntry { name: String, limit: u64 },

    #[error("signature entry is malformed: {0}")]
    MalformedSignature(String),

    #[error("signature does not match any trusted key")]
    SignatureMismatch,
}

/// Verifies Ed25519-signed ZIP manifest containers.
///
/// # Examples
///
/// ```
/// use ed25519_dalek::SigningKey;
/// use release_channel::seal::seal_container;
/// use release_channel::trust::{SignedContainerVerifier, TrustVerifier};
/// use std::io::Cursor;
///
/// let key = SigningKey::from_bytes(&[1u8; 32]);
/// let container = seal_container(
///     r#"{"current-version":"1.0.0","production-minimum-version":"1.0.0"}"#,
///     &key,
/// )
/// .expect("sealed");
///
/// let verifier = SignedContainerVerifier::new(vec![key.verifying_key()]);
/// assert!(verifier.is_trusted(&mut Cursor::new(container)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignedContainerVerifier {
    trusted_keys: Vec<VerifyingKey>,
}

impl SignedContainerVerifier {
    /// Create a verifier trusting `trusted_keys`. An empty set trusts nothing.
    #[must_use]
    pub const fn new(trusted_keys: Vec<VerifyingKey>) -> Self {
        Self { trusted_keys }
    }

    /// Create a verifier from hex-encoded public keys.
    ///
    /// # Errors
    ///
    /// Returns the first [`KeyError`] encountered.
    pub fn from_hex_keys<I, S>(keys: I) -> std::result::Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trusted_keys = keys
            .into_iter()
            .map(|key| parse_verifying_key(key.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(trusted_keys))
    }

    /// Return the trusted public keys.
    #[must_use]
    pub fn trusted_keys(&self) -> &[VerifyingKey] {
        &self.trusted_keys
    }

    fn check(&self, stream: &mut dyn ReadSeek) -> std::result::Result<(), VerificationFailure> {
        if self.trusted_keys.is_empty() {
            return Err(VerificationFailure::NoTrustedKeys);
        }

        let mut archive = zip::ZipArchive::new(stream)?;
        let signature = read_signature(&mut archive)?;

        let mut budget = MAX_HASHED_BYTES;
        let mut digests = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() || entry.name() == SIGNATURE_ENTRY {
                continue;
            }
            let name = entry.name().to_owned();
            // Declared sizes are unauthenticated; the read is capped as well.
            let limit = MAX_ENTRY_BYTES.min(budget);
            if entry.size() > limit {
                return Err(VerificationFailure::OversizedEntry { name, limit });
            }
            let mut hasher = Sha256::new();
            let hashed = std::io::copy(&mut (&mut entry).take(limit + 1), &mut hasher)?;
            if hashed > limit {
                return Err(VerificationFailure::OversizedEntry { name, limit });
            }
            budget -= hashed;
            digests.push((name, hex::encode(hasher.finalize())));
        }
        let message = digest_listing(digests);

        if self
            .trusted_keys
            .iter()
            .any(|key| key.verify_strict(message.as_bytes(), &signature).is_ok())
        {
            Ok(())
        } else {
            Err(VerificationFailure::SignatureMismatch)
        }
    }
}

impl TrustVerifier for SignedContainerVerifier {
    fn is_trusted(&self, stream: &mut dyn ReadSeek) -> bool {
        match self.check(stream) {
            Ok(()) => true,
            Err(reason) => {
                debug!(target: "release_channel::trust", "container rejected: {reason}");
                false
            }
        }
    }
}

fn read_signature<R: std::io::Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> std::result::Result<Signature, VerificationFailure> {
    let entry = archive.by_name(SIGNATURE_ENTRY).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => VerificationFailure::MissingSignature,
        other => VerificationFailure::Container(other),
    })?;
    let mut text = String::new();
    entry.take(MAX_SIGNATURE_BYTES).read_to_string(&mut text)?;

    let decoded = hex::decode(text.trim())
        .map_err(|e| VerificationFailure::MalformedSignature(e.to_string()))?;
    let bytes: [u8; SIGNATURE_LENGTH] = decoded.try_into().map_err(|raw: Vec<u8>| {
        VerificationFailure::MalformedSignature(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            raw.len()
        ))
    })?;
    Ok(Signature::from_bytes(&bytes))
}

/// Build the signed message from `(entry name, lowercase hex SHA-256)` pairs.
///
/// Entries are sorted by name and rendered one per line in `sha256sum`
/// format, so the listing is independent of archive entry order.
///
/// # Examples
///
/// ```
/// use release_channel::trust::digest_listing;
///
/// let listing = digest_listing(vec![
///     ("b".to_owned(), "22".to_owned()),
///     ("a".to_owned(), "11".to_owned()),
/// ]);
/// assert_eq!(listing, "11  a\n22  b\n");
/// ```
#[must_use]
pub fn digest_listing(mut entries: Vec<(String, String)>) -> String {
    entries.sort_by(|left, right| left.0.cmp(&right.0));
    entries
        .into_iter()
        .map(|(name, digest)| format!("{digest}  {name}\n"))
        .collect()
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
