//! CLI argument definitions for the release-channel client.
//!
//! Kept apart from the entrypoint so the parser can be exercised in tests
//! without running any command.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use release_channel::ReleaseChannel;

/// Inspect and publish trust-gated release channel manifests.
#[derive(Parser, Debug)]
#[command(name = "release-channel")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Check the production channel:\n",
    "    $ release-channel check production --config release-channel.toml\n\n",
    "  Inspect a downloaded container:\n",
    "    $ release-channel inspect ReleaseInfo.zip --config release-channel.toml\n\n",
    "  Seal a manifest for publication:\n",
    "    $ release-channel seal --manifest ReleaseInfo.json --key signing.key --output ReleaseInfo.zip",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch and resolve a channel's manifest over HTTP.
    Check(CheckArgs),

    /// Decode a local manifest container.
    Inspect(InspectArgs),

    /// Seal manifest JSON into a signed container.
    Seal(SealArgs),
}

/// Arguments for the check command.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Channel to resolve (production, insider or canary).
    #[arg(value_name = "CHANNEL")]
    pub channel: ReleaseChannel,

    /// Resolver configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// Arguments for the inspect command.
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Manifest container to decode.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Resolver configuration file naming the trusted keys.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// Arguments for the seal command.
#[derive(Parser, Debug, Clone)]
pub struct SealArgs {
    /// Manifest JSON to seal.
    #[arg(long, value_name = "JSON")]
    pub manifest: Utf8PathBuf,

    /// File holding the hex-encoded Ed25519 signing key seed.
    #[arg(long, value_name = "HEXFILE")]
    pub key: Utf8PathBuf,

    /// Where to write the sealed container.
    #[arg(short, long, value_name = "ZIP")]
    pub output: Utf8PathBuf,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
