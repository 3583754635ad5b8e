//! Failure reporting for the quiet resolution API.

use crate::error::ChannelInfoError;
use log::warn;

/// Receives failures that the quiet API would otherwise swallow.
///
/// Reporters must not fail; anything they need to do with the error happens
/// as a side effect.
#[cfg_attr(test, mockall::automock)]
pub trait FailureReporter {
    /// Record `error`.
    fn report(&self, error: &ChannelInfoError);
}

/// Reporter forwarding failures to the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, error: &ChannelInfoError) {
        warn!(target: "release_channel", "unable to get channel info: {error}");
    }
}
