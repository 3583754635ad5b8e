//! Error types for the release-channel CLI.

use camino::Utf8PathBuf;
use release_channel::seal::SealError;
use release_channel::{ConfigError, InvalidChannelData, ReleaseChannel};
use thiserror::Error;

/// Errors that end a CLI invocation with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded or names a bad key.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `check` needs somewhere to fetch containers from.
    #[error("no retrieval base_url configured; set [retrieval] base_url in the config file")]
    MissingBaseUrl,

    /// The HTTP client could not be configured.
    #[error("invalid retrieval base_url {url}: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Resolution produced no information; details were already reported.
    #[error("no channel information available for {channel}")]
    Unavailable {
        /// The channel that could not be resolved.
        channel: ReleaseChannel,
    },

    /// A local container failed to decode.
    #[error("{path}: {source}")]
    InvalidContainer {
        /// The container that was rejected.
        path: Utf8PathBuf,
        /// The opaque decode failure.
        source: InvalidChannelData,
    },

    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Sealing the manifest failed.
    #[error("sealing failed: {0}")]
    Seal(#[from] SealError),
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(target: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = target.into();
        move |source| Self::Io { path, source }
    }
}
