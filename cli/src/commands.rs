//! Command implementations.
//!
//! Each command takes its output streams explicitly so tests can capture
//! them. [`check_with`] additionally takes the channel source, letting tests
//! substitute a stub for HTTP.

use std::fs::File;
use std::io::{BufReader, Write};
use std::time::Duration;

use camino::Utf8Path;
use log::debug;
use release_channel::seal::{seal_container, signing_key_from_hex};
use release_channel::{
    ChannelResolver, ChannelSource, ResolverConfig, SignedContainerVerifier,
    get_channel_from_stream,
};

use crate::cli::{CheckArgs, Cli, Command, InspectArgs, SealArgs};
use crate::error::{CliError, Result};
use crate::http::HttpChannelSource;
use crate::output::{WriterReporter, channel_summary, release_summary, write_line};

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns the [`CliError`] of whichever command fails.
pub fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Check(args) => check(args, cli.quiet, stdout, stderr),
        Command::Inspect(args) => inspect(args, stdout),
        Command::Seal(args) => seal(args, cli.quiet, stderr),
    }
}

/// Load the configuration file, or defaults when none is given.
fn load_config(path: Option<&Utf8Path>) -> Result<ResolverConfig> {
    let config = path.map_or_else(|| Ok(ResolverConfig::default()), ResolverConfig::load)?;
    Ok(config)
}

fn check(
    args: &CheckArgs,
    quiet: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let base_url = config
        .retrieval
        .base_url
        .as_deref()
        .ok_or(CliError::MissingBaseUrl)?;
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(CliError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "expected an http or https URL".to_owned(),
        });
    }
    let source = HttpChannelSource::new(
        base_url,
        Duration::from_secs(config.retrieval.timeout_secs),
    );
    if !quiet {
        write_line(
            stderr,
            format!("Checking {} channel at {}...", args.channel, source.channel_url(args.channel)),
        );
    }
    check_with(args, &config, &source, stdout, stderr)
}

/// Resolve `args.channel` through `source` and print the outcome.
///
/// Failures are written to `stderr` as they are reported.
///
/// # Errors
///
/// Returns [`CliError::Config`] for bad trusted keys and
/// [`CliError::Unavailable`] when the channel cannot be resolved.
pub fn check_with(
    args: &CheckArgs,
    config: &ResolverConfig,
    source: &dyn ChannelSource,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let verifier = config.verifier()?;
    let reporter = WriterReporter::new(stderr);
    let outcome = ChannelResolver::new(source, &verifier)
        .with_reporter(&reporter)
        .with_untrusted_policy(config.untrusted_policy())
        .try_resolve(args.channel);

    let info = outcome.ok_or(CliError::Unavailable {
        channel: args.channel,
    })?;
    write_line(stdout, channel_summary(&info).trim_end());
    Ok(())
}

fn inspect(args: &InspectArgs, stdout: &mut dyn Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let verifier = config.verifier()?;
    inspect_with(&args.file, &verifier, stdout)
}

/// Decode the container at `path` and print its manifest.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be opened and
/// [`CliError::InvalidContainer`] when it does not decode.
pub fn inspect_with(
    path: &Utf8Path,
    verifier: &SignedContainerVerifier,
    stdout: &mut dyn Write,
) -> Result<()> {
    let file = File::open(path).map_err(CliError::io(path))?;
    let mut reader = BufReader::new(file);
    let release = get_channel_from_stream(&mut reader, verifier).map_err(|source| {
        CliError::InvalidContainer {
            path: path.to_owned(),
            source,
        }
    })?;
    write_line(stdout, release_summary(&release).trim_end());
    Ok(())
}

fn seal(args: &SealArgs, quiet: bool, stderr: &mut dyn Write) -> Result<()> {
    let manifest = std::fs::read_to_string(&args.manifest).map_err(CliError::io(&args.manifest))?;
    let key_text = std::fs::read_to_string(&args.key).map_err(CliError::io(&args.key))?;
    let signing_key = signing_key_from_hex(&key_text)?;

    let container = seal_container(&manifest, &signing_key)?;
    std::fs::write(&args.output, &container).map_err(CliError::io(&args.output))?;
    debug!(
        target: "release_channel_cli::seal",
        "wrote {} bytes to {}",
        container.len(),
        args.output
    );

    if !quiet {
        write_line(stderr, format!("Sealed {} into {}", args.manifest, args.output));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
