//! Channel resolution: retrieval, decoding and minimum-version rules.
//!
//! [`ChannelResolver::resolve`] is the error-returning core.
//! [`ChannelResolver::try_resolve`] is the boundary used by callers that
//! must never fail: every error, and any panic raised by a collaborator, is
//! handed to the optional [`FailureReporter`] and turned into `None`.

use std::any::Any;
use std::io::Cursor;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::debug;

use crate::channel::ReleaseChannel;
use crate::decoder::decode_manifest;
use crate::error::{ChannelInfoError, Result};
use crate::release::ChannelInfo;
use crate::reporter::FailureReporter;
use crate::source::ChannelSource;
use crate::trust::TrustVerifier;

/// Whether trust-gate rejections reach the failure reporter.
///
/// Retrieval, decode and panic failures are always reported. A trust
/// rejection is reported only under [`UntrustedPolicy::Report`]; under the
/// default [`UntrustedPolicy::Silent`] it still resolves to `None` but never
/// reaches the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UntrustedPolicy {
    /// Untrusted manifests resolve to `None` without a report.
    #[default]
    Silent,
    /// Untrusted manifests are reported like any other failure.
    Report,
}

impl UntrustedPolicy {
    /// Select a policy from a "report untrusted" flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_channel::resolver::UntrustedPolicy;
    ///
    /// assert_eq!(UntrustedPolicy::from_flag(true), UntrustedPolicy::Report);
    /// ```
    #[must_use]
    pub const fn from_flag(report_untrusted: bool) -> Self {
        if report_untrusted {
            Self::Report
        } else {
            Self::Silent
        }
    }

    /// Return whether `error` should be forwarded under this policy.
    #[must_use]
    pub const fn should_report(self, error: &ChannelInfoError) -> bool {
        match self {
            Self::Report => true,
            Self::Silent => !error.is_untrusted(),
        }
    }
}

/// Resolves release channels into [`ChannelInfo`] records.
///
/// The resolver borrows its collaborators; each call allocates and drops its
/// own buffer, so one resolver can serve any number of calls.
pub struct ChannelResolver<'a> {
    source: &'a dyn ChannelSource,
    verifier: &'a dyn TrustVerifier,
    reporter: Option<&'a dyn FailureReporter>,
    untrusted_policy: UntrustedPolicy,
}

impl<'a> ChannelResolver<'a> {
    /// Create a resolver without a reporter, using the default policy.
    #[must_use]
    pub const fn new(source: &'a dyn ChannelSource, verifier: &'a dyn TrustVerifier) -> Self {
        Self {
            source,
            verifier,
            reporter: None,
            untrusted_policy: UntrustedPolicy::Silent,
        }
    }

    /// Forward failures from [`Self::try_resolve`] to `reporter`.
    #[must_use]
    pub const fn with_reporter(mut self, reporter: &'a dyn FailureReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Set whether untrusted manifests are reported.
    #[must_use]
    pub const fn with_untrusted_policy(mut self, policy: UntrustedPolicy) -> Self {
        self.untrusted_policy = policy;
        self
    }

    /// Fetch, verify and decode the manifest for `channel`.
    ///
    /// Production resolves to the manifest's production minimum version;
    /// every other channel requires its current version.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelInfoError::RetrievalFailed`] when the source fails
    /// and any decode error from [`decode_manifest`].
    pub fn resolve(&self, channel: ReleaseChannel) -> Result<ChannelInfo> {
        let mut buffer = Vec::new();
        let metadata = self.source.load_channel_info(channel, &mut buffer)?;
        debug!(
            target: "release_channel::resolver",
            "retrieved {} bytes for {channel} from {}",
            buffer.len(),
            metadata.source()
        );

        let release = decode_manifest(&mut Cursor::new(buffer), self.verifier)?;
        let info = ChannelInfo::resolve(channel, release, metadata);
        debug!(
            target: "release_channel::resolver",
            "{channel}: current {}, minimum {}",
            info.current_version(),
            info.minimum_version()
        );
        Ok(info)
    }

    /// Resolve `channel`, reducing every failure to `None`.
    ///
    /// Never returns an error and never lets a collaborator panic escape.
    #[must_use]
    pub fn try_resolve(&self, channel: ReleaseChannel) -> Option<ChannelInfo> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.resolve(channel))).unwrap_or_else(
            |payload| {
                Err(ChannelInfoError::Panicked {
                    message: panic_message(payload),
                })
            },
        );

        match outcome {
            Ok(info) => Some(info),
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    fn report(&self, error: &ChannelInfoError) {
        if !self.untrusted_policy.should_report(error) {
            debug!(target: "release_channel::resolver", "not reporting: {error}");
            return;
        }
        let Some(reporter) = self.reporter else {
            debug!(target: "release_channel::resolver", "no reporter for: {error}");
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| reporter.report(error))).is_err() {
            debug!(target: "release_channel::resolver", "failure reporter panicked");
        }
    }
}

/// Resolve `channel` once with the default untrusted policy.
///
/// Equivalent to building a [`ChannelResolver`] and calling
/// [`ChannelResolver::try_resolve`].
#[must_use]
pub fn try_get_channel_info(
    channel: ReleaseChannel,
    source: &dyn ChannelSource,
    verifier: &dyn TrustVerifier,
    reporter: Option<&dyn FailureReporter>,
) -> Option<ChannelInfo> {
    let mut resolver = ChannelResolver::new(source, verifier);
    if let Some(found) = reporter {
        resolver = resolver.with_reporter(found);
    }
    resolver.try_resolve(channel)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload.downcast::<String>().map_or_else(
        |payload| {
            payload.downcast::<&'static str>().map_or_else(
                |_| "panicked without a message".to_owned(),
                |message| (*message).to_owned(),
            )
        },
        |message| *message,
    )
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
