//! Provenance of a retrieved manifest stream.

use std::time::SystemTime;

/// Describes where and when manifest bytes were obtained.
///
/// Produced by a [`ChannelSource`](crate::source::ChannelSource) and attached
/// unchanged to the resolved [`ChannelInfo`](crate::release::ChannelInfo).
///
/// # Examples
///
/// ```
/// use release_channel::metadata::RetrievalMetadata;
///
/// let metadata = RetrievalMetadata::new("https://example.test/production/ReleaseInfo.zip")
///     .with_etag("\"abc\"");
/// assert_eq!(metadata.etag(), Some("\"abc\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalMetadata {
    source: String,
    retrieved_at: SystemTime,
    etag: Option<String>,
}

impl RetrievalMetadata {
    /// Record a retrieval from `source` happening now.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self::at(source, SystemTime::now())
    }

    /// Record a retrieval from `source` at an explicit time.
    #[must_use]
    pub fn at(source: impl Into<String>, retrieved_at: SystemTime) -> Self {
        Self {
            source: source.into(),
            retrieved_at,
            etag: None,
        }
    }

    /// Attach the entity tag reported by the origin.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Return the source location (URL or path).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Return when the bytes were retrieved.
    #[must_use]
    pub const fn retrieved_at(&self) -> SystemTime {
        self.retrieved_at
    }

    /// Return the entity tag, if the origin supplied one.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
}
