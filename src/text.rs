//! UTF-16 resource text decoding.
//!
//! Manifest resources are stored as UTF-16LE text, usually with a leading
//! byte-order mark. The mark is not valid JSON, so it is stripped before the
//! remaining code units are decoded.

use crate::error::{ChannelInfoError, Result};

/// The little-endian byte-order mark.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// The big-endian byte-order mark, which manifests must not use.
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Decode UTF-16LE resource bytes into text, dropping a leading BOM.
///
/// # Errors
///
/// Returns [`ChannelInfoError::InvalidPayload`] when the input is empty,
/// carries a big-endian mark, has an odd number of bytes after the mark,
/// contains an unpaired surrogate, or decodes to empty text.
///
/// # Examples
///
/// ```
/// use release_channel::text::decode_resource_text;
///
/// let bytes = [0xFF, 0xFE, b'{', 0, b'}', 0];
/// assert_eq!(decode_resource_text(&bytes).expect("valid UTF-16"), "{}");
/// ```
pub fn decode_resource_text(bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(invalid("resource is empty"));
    }
    if bytes.starts_with(&UTF16_BE_BOM) {
        return Err(invalid("big-endian UTF-16 is not supported"));
    }
    let body = bytes.strip_prefix(&UTF16_LE_BOM).unwrap_or(bytes);
    if body.len() % 2 != 0 {
        return Err(invalid(format!(
            "UTF-16 payload has an odd length of {} bytes",
            body.len()
        )));
    }

    // Little-endian: the second byte of each pair is the high byte.
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            pair.iter()
                .rev()
                .fold(0u16, |unit, byte| (unit << 8) | u16::from(*byte))
        })
        .collect();
    let text = String::from_utf16(&units).map_err(|e| invalid(e.to_string()))?;
    if text.is_empty() {
        return Err(invalid("resource contains no text"));
    }
    Ok(text)
}

/// Encode `text` as UTF-16LE prefixed with the byte-order mark.
///
/// This is the inverse of [`decode_resource_text`] and is used when sealing
/// manifest containers.
#[must_use]
pub fn encode_resource_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF16_LE_BOM.len() + text.len() * 2);
    bytes.extend_from_slice(&UTF16_LE_BOM);
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    bytes
}

fn invalid(reason: impl Into<String>) -> ChannelInfoError {
    ChannelInfoError::InvalidPayload {
        reason: reason.into(),
    }
}
