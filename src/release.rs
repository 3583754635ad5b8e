//! Release metadata records.
//!
//! [`ReleaseInfo`] is what the manifest resource deserialises into.
//! [`ChannelInfo`] is the resolved form: it adds the requested channel, the
//! channel-specific minimum version, and retrieval provenance. Only the
//! resolver constructs a [`ChannelInfo`], so the resolved fields cannot be
//! observed before resolution has completed.

use crate::channel::ReleaseChannel;
use crate::metadata::RetrievalMetadata;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Channel-agnostic contents of a release manifest.
///
/// The JSON schema uses kebab-case keys:
///
/// ```json
/// {
///   "current-version": "2.0.0",
///   "production-minimum-version": "1.5.0",
///   "install-asset": "https://example.test/release/Setup.msi",
///   "release-notes-asset": "https://example.test/release/notes.md"
/// }
/// ```
///
/// Only the two version keys are required; unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use release_channel::release::ReleaseInfo;
///
/// let info: ReleaseInfo = serde_json::from_str(
///     r#"{"current-version":"2.0.0","production-minimum-version":"1.5.0"}"#,
/// )
/// .expect("valid manifest");
/// assert_eq!(info.current_version().to_string(), "2.0.0");
/// assert!(info.install_asset().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseInfo {
    current_version: Version,
    production_minimum_version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    install_asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    release_notes_asset: Option<String>,
}

impl ReleaseInfo {
    /// Construct a record from its two required versions.
    #[must_use]
    pub const fn new(current_version: Version, production_minimum_version: Version) -> Self {
        Self {
            current_version,
            production_minimum_version,
            install_asset: None,
            release_notes_asset: None,
        }
    }

    /// Attach the installer asset location.
    #[must_use]
    pub fn with_install_asset(mut self, url: impl Into<String>) -> Self {
        self.install_asset = Some(url.into());
        self
    }

    /// Attach the release notes asset location.
    #[must_use]
    pub fn with_release_notes_asset(mut self, url: impl Into<String>) -> Self {
        self.release_notes_asset = Some(url.into());
        self
    }

    /// The newest version published on the channel.
    #[must_use]
    pub const fn current_version(&self) -> &Version {
        &self.current_version
    }

    /// The oldest version production clients may keep running.
    #[must_use]
    pub const fn production_minimum_version(&self) -> &Version {
        &self.production_minimum_version
    }

    /// Location of the installer for the current version, if published.
    #[must_use]
    pub fn install_asset(&self) -> Option<&str> {
        self.install_asset.as_deref()
    }

    /// Location of the release notes for the current version, if published.
    #[must_use]
    pub fn release_notes_asset(&self) -> Option<&str> {
        self.release_notes_asset.as_deref()
    }

    /// Select the minimum acceptable version for `channel`.
    ///
    /// Production uses the dedicated production minimum; every other channel
    /// requires the current version.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_channel::channel::ReleaseChannel;
    /// use release_channel::release::ReleaseInfo;
    /// use semver::Version;
    ///
    /// let info = ReleaseInfo::new(Version::new(2, 0, 0), Version::new(1, 5, 0));
    /// assert_eq!(info.minimum_version_for(ReleaseChannel::Production), &Version::new(1, 5, 0));
    /// assert_eq!(info.minimum_version_for(ReleaseChannel::Canary), &Version::new(2, 0, 0));
    /// ```
    #[must_use]
    pub const fn minimum_version_for(&self, channel: ReleaseChannel) -> &Version {
        if channel.is_production() {
            &self.production_minimum_version
        } else {
            &self.current_version
        }
    }
}

/// A verified, decoded manifest resolved for a specific channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    channel: ReleaseChannel,
    release: ReleaseInfo,
    minimum_version: Version,
    metadata: RetrievalMetadata,
}

impl ChannelInfo {
    /// Resolve `release` for `channel`, attaching provenance.
    pub(crate) fn resolve(
        channel: ReleaseChannel,
        release: ReleaseInfo,
        metadata: RetrievalMetadata,
    ) -> Self {
        let minimum_version = release.minimum_version_for(channel).clone();
        Self {
            channel,
            release,
            minimum_version,
            metadata,
        }
    }

    /// The channel this record was resolved for.
    #[must_use]
    pub const fn channel(&self) -> ReleaseChannel {
        self.channel
    }

    /// The decoded manifest contents.
    #[must_use]
    pub const fn release(&self) -> &ReleaseInfo {
        &self.release
    }

    /// Shorthand for the manifest's current version.
    #[must_use]
    pub const fn current_version(&self) -> &Version {
        self.release.current_version()
    }

    /// The minimum acceptable version for [`Self::channel`].
    #[must_use]
    pub const fn minimum_version(&self) -> &Version {
        &self.minimum_version
    }

    /// Where and when the manifest bytes were retrieved.
    #[must_use]
    pub const fn metadata(&self) -> &RetrievalMetadata {
        &self.metadata
    }

    /// Return whether `installed` is older than the minimum version.
    #[must_use]
    pub fn requires_update(&self, installed: &Version) -> bool {
        installed < &self.minimum_version
    }
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;
