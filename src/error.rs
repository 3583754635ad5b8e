//! Error types for channel manifest resolution.
//!
//! [`ChannelInfoError`] carries the full failure taxonomy used inside the
//! pipeline and handed to failure reporters. [`InvalidChannelData`] is the
//! deliberately opaque error surfaced by the single-stream decode API.

use crate::source::RetrievalError;
use thiserror::Error;

/// Errors arising anywhere in the manifest resolution pipeline.
#[derive(Debug, Error)]
pub enum ChannelInfoError {
    /// The trust verifier rejected the stream, or could not verify it.
    #[error("manifest is not trusted")]
    UntrustedManifest,

    /// The named resource is absent from the container.
    #[error("resource \"{name}\" not found in manifest container")]
    ResourceNotFound {
        /// Name of the missing resource.
        name: String,
    },

    /// The resource bytes could not be decoded into manifest text.
    #[error("invalid manifest payload: {reason}")]
    InvalidPayload {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The manifest text parsed but required fields are missing or invalid.
    #[error("malformed manifest: {reason}")]
    MalformedManifest {
        /// Description of the schema violation.
        reason: String,
    },

    /// The retrieval collaborator could not populate the stream.
    #[error("manifest retrieval failed: {0}")]
    RetrievalFailed(#[from] RetrievalError),

    /// Repositioning or reading the in-memory stream failed.
    #[error("I/O error while decoding manifest: {0}")]
    Io(#[from] std::io::Error),

    /// A collaborator panicked during resolution.
    #[error("channel resolution panicked: {message}")]
    Panicked {
        /// The panic payload, when it carried a message.
        message: String,
    },
}

impl ChannelInfoError {
    /// Return whether this error is the trust-gate rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_channel::error::ChannelInfoError;
    ///
    /// assert!(ChannelInfoError::UntrustedManifest.is_untrusted());
    /// ```
    #[must_use]
    pub const fn is_untrusted(&self) -> bool {
        matches!(self, Self::UntrustedManifest)
    }
}

/// Result type alias using [`ChannelInfoError`].
pub type Result<T> = std::result::Result<T, ChannelInfoError>;

/// The single failure exposed by
/// [`get_channel_from_stream`](crate::decoder::get_channel_from_stream).
///
/// It intentionally hides which stage of the pipeline failed: the contract is
/// "valid record or this error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unable to get channel info")]
pub struct InvalidChannelData;
