//! Manifest decoding from trusted container streams.
//!
//! Composes the pipeline stages in order: trust gate, resource extraction,
//! UTF-16 text decoding and JSON parsing into a [`ReleaseInfo`]. Any stage
//! failing aborts the decode; no partial record is ever produced.

use crate::error::{ChannelInfoError, InvalidChannelData, Result};
use crate::release::ReleaseInfo;
use crate::resource::{ResourceExtractor, ZipResourceExtractor};
use crate::stream::ReadSeek;
use crate::text::decode_resource_text;
use crate::trust::{TrustGate, TrustVerifier};
use log::debug;
use serde_json::error::Category;

/// Name of the manifest resource inside a container.
pub const MANIFEST_RESOURCE_NAME: &str = "release-channel/ReleaseInfo.json";

/// Decode the manifest held in `stream` using the ZIP extractor.
///
/// # Errors
///
/// Returns [`ChannelInfoError::UntrustedManifest`] when `verifier` rejects
/// the stream, and the extraction, payload or schema error of whichever
/// stage fails after that.
pub fn decode_manifest(
    stream: &mut dyn ReadSeek,
    verifier: &dyn TrustVerifier,
) -> Result<ReleaseInfo> {
    decode_manifest_with(stream, verifier, &ZipResourceExtractor)
}

/// Decode the manifest held in `stream` with an explicit extractor.
///
/// # Errors
///
/// See [`decode_manifest`].
pub fn decode_manifest_with(
    stream: &mut dyn ReadSeek,
    verifier: &dyn TrustVerifier,
    extractor: &dyn ResourceExtractor,
) -> Result<ReleaseInfo> {
    TrustGate::new(verifier).admit(stream)?;
    let bytes = extractor.extract(stream, MANIFEST_RESOURCE_NAME)?;
    let text = decode_resource_text(&bytes)?;
    parse_release_info(&text)
}

/// Parse manifest JSON text into a [`ReleaseInfo`].
///
/// Syntax errors and truncated input are payload errors; well-formed JSON
/// that violates the schema is a malformed manifest.
///
/// # Errors
///
/// Returns [`ChannelInfoError::InvalidPayload`] or
/// [`ChannelInfoError::MalformedManifest`] as described above.
///
/// # Examples
///
/// ```
/// use release_channel::decoder::parse_release_info;
///
/// let info = parse_release_info(
///     r#"{"current-version":"2.0.0","production-minimum-version":"1.5.0"}"#,
/// )
/// .expect("valid manifest");
/// assert_eq!(info.current_version().to_string(), "2.0.0");
/// ```
pub fn parse_release_info(text: &str) -> Result<ReleaseInfo> {
    serde_json::from_str(text).map_err(classify_json_error)
}

fn classify_json_error(err: serde_json::Error) -> ChannelInfoError {
    match err.classify() {
        Category::Data => ChannelInfoError::MalformedManifest {
            reason: err.to_string(),
        },
        Category::Syntax | Category::Eof | Category::Io => ChannelInfoError::InvalidPayload {
            reason: err.to_string(),
        },
    }
}

/// Decode a single container stream, hiding the cause of any failure.
///
/// The underlying [`ChannelInfoError`] is logged at debug level only.
///
/// # Errors
///
/// Returns [`InvalidChannelData`] whenever [`decode_manifest`] fails.
pub fn get_channel_from_stream(
    stream: &mut dyn ReadSeek,
    verifier: &dyn TrustVerifier,
) -> std::result::Result<ReleaseInfo, InvalidChannelData> {
    decode_manifest(stream, verifier).map_err(|err| {
        debug!(target: "release_channel::decoder", "channel data rejected: {err}");
        InvalidChannelData
    })
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
