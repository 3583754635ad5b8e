//! Release channel enumeration.
//!
//! Each channel names a release track with its own manifest and its own
//! minimum-version rule. Only [`ReleaseChannel::Production`] uses the
//! manifest's dedicated production minimum; every other channel treats the
//! current version as the minimum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A release track served by the update manifest host.
///
/// # Examples
///
/// ```
/// use release_channel::channel::ReleaseChannel;
///
/// let channel: ReleaseChannel = "Insider".parse().expect("known channel");
/// assert_eq!(channel, ReleaseChannel::Insider);
/// assert_eq!(channel.as_str(), "insider");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    /// The stable, general-availability track.
    #[default]
    Production,
    /// Pre-release builds for early adopters.
    Insider,
    /// Bleeding-edge builds.
    Canary,
}

impl ReleaseChannel {
    /// Every channel, in order of decreasing stability.
    pub const ALL: [Self; 3] = [Self::Production, Self::Insider, Self::Canary];

    /// Return the lower-case channel name used in URLs and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Insider => "insider",
            Self::Canary => "canary",
        }
    }

    /// Return whether this channel uses the production minimum-version rule.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown release channel \"{value}\"; expected one of: production, insider, canary")]
pub struct UnknownChannel {
    /// The rejected channel name.
    pub value: String,
}

impl FromStr for ReleaseChannel {
    type Err = UnknownChannel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownChannel {
                value: value.to_owned(),
            })
    }
}
