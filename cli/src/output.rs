//! Output formatting for the release-channel CLI.
//!
//! Results go to stdout as `key: value` lines; progress and failure details
//! go to stderr.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::io::Write;

use release_channel::{ChannelInfo, ChannelInfoError, FailureReporter, ReleaseChannel, ReleaseInfo};

/// Write `message` and a newline to `stream`, ignoring write failures.
pub fn write_line(stream: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stream, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Render a resolved channel for display.
#[must_use]
pub fn channel_summary(info: &ChannelInfo) -> String {
    let mut text = String::new();
    push_field(&mut text, "channel", info.channel());
    push_field(&mut text, "current version", info.current_version());
    push_field(&mut text, "minimum version", info.minimum_version());
    push_field(&mut text, "source", info.metadata().source());
    if let Some(etag) = info.metadata().etag() {
        push_field(&mut text, "etag", etag);
    }
    push_assets(&mut text, info.release());
    text
}

/// Render a decoded manifest, including each channel's minimum version.
#[must_use]
pub fn release_summary(release: &ReleaseInfo) -> String {
    let mut text = String::new();
    push_field(&mut text, "current version", release.current_version());
    push_field(
        &mut text,
        "production minimum version",
        release.production_minimum_version(),
    );
    for channel in ReleaseChannel::ALL {
        push_field(
            &mut text,
            &format!("{channel} minimum"),
            release.minimum_version_for(channel),
        );
    }
    push_assets(&mut text, release);
    text
}

fn push_assets(text: &mut String, release: &ReleaseInfo) {
    if let Some(asset) = release.install_asset() {
        push_field(text, "install asset", asset);
    }
    if let Some(asset) = release.release_notes_asset() {
        push_field(text, "release notes", asset);
    }
}

fn push_field(text: &mut String, label: &str, value: impl std::fmt::Display) {
    if writeln!(text, "{label}: {value}").is_err() {
        // Writing to a String cannot fail.
    }
}

/// Failure reporter writing each failure as a line on a stream.
pub struct WriterReporter<W: Write> {
    stream: RefCell<W>,
}

impl<W: Write> WriterReporter<W> {
    /// Report failures to `stream`.
    #[must_use]
    pub const fn new(stream: W) -> Self {
        Self {
            stream: RefCell::new(stream),
        }
    }

    /// Return the wrapped stream.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }
}

impl<W: Write> FailureReporter for WriterReporter<W> {
    fn report(&self, error: &ChannelInfoError) {
        if let Ok(mut stream) = self.stream.try_borrow_mut() {
            write_line(&mut *stream, format!("error: {error}"));
        }
    }
}
