//! Retrieval of manifest containers.
//!
//! The resolver does not know where containers come from. A
//! [`ChannelSource`] fills a caller-owned buffer with the container bytes for
//! a channel and reports where and when they were fetched.

use crate::channel::ReleaseChannel;
use crate::metadata::RetrievalMetadata;
use thiserror::Error;

/// Errors raised while fetching a manifest container.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The transport failed or the server answered with an error status.
    #[error("failed to fetch {url}: {reason}")]
    Http {
        /// Location that was requested.
        url: String,
        /// Description of the failure.
        reason: String,
    },

    /// No container is published at the requested location.
    #[error("no manifest published at {url}")]
    NotFound {
        /// Location that was requested.
        url: String,
    },

    /// Reading the response body or a local container failed.
    #[error("I/O error while fetching manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for fetching the manifest container of a release channel.
///
/// Implementations append the container bytes to `dest`, which the caller
/// passes in empty.
#[cfg_attr(test, mockall::automock)]
pub trait ChannelSource {
    /// Fetch the container for `channel` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns a [`RetrievalError`] when the container cannot be fetched.
    fn load_channel_info(
        &self,
        channel: ReleaseChannel,
        dest: &mut Vec<u8>,
    ) -> Result<RetrievalMetadata, RetrievalError>;
}
