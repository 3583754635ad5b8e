//! Hex-encoded Ed25519 key parsing.
//!
//! Keys appear in configuration files and on the command line as lowercase
//! or uppercase hex strings of exactly 32 bytes.

use ed25519_dalek::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SigningKey, VerifyingKey};
use thiserror::Error;

/// Errors arising from invalid key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The value is not valid hex.
    #[error("key is not valid hex: {reason}")]
    InvalidHex {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The decoded key has the wrong number of bytes.
    #[error("key must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Required key length in bytes.
        expected: usize,
        /// Length of the rejected key.
        actual: usize,
    },

    /// The bytes do not describe a usable Ed25519 public key.
    #[error("invalid Ed25519 public key: {reason}")]
    InvalidPublicKey {
        /// Description of the rejection.
        reason: String,
    },
}

fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], KeyError> {
    let bytes = hex::decode(value.trim()).map_err(|e| KeyError::InvalidHex {
        reason: e.to_string(),
    })?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| KeyError::WrongLength {
        expected: N,
        actual,
    })
}

/// Parse a hex-encoded Ed25519 public key.
///
/// # Errors
///
/// Returns a [`KeyError`] when the value is not 32 bytes of hex or is not a
/// valid curve point.
///
/// # Examples
///
/// ```
/// use release_channel::keys::{parse_verifying_key, KeyError};
///
/// assert!(matches!(parse_verifying_key("abcd"), Err(KeyError::WrongLength { .. })));
/// ```
pub fn parse_verifying_key(value: &str) -> Result<VerifyingKey, KeyError> {
    let bytes = decode_fixed::<PUBLIC_KEY_LENGTH>(value)?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| KeyError::InvalidPublicKey {
        reason: e.to_string(),
    })
}

/// Parse a hex-encoded Ed25519 secret key seed.
///
/// # Errors
///
/// Returns a [`KeyError`] when the value is not 32 bytes of hex.
pub fn parse_signing_key(value: &str) -> Result<SigningKey, KeyError> {
    let bytes = decode_fixed::<SECRET_KEY_LENGTH>(value)?;
    Ok(SigningKey::from_bytes(&bytes))
}
