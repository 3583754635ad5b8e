//! Release channel CLI entrypoint.
//!
//! Resolves channel manifests from a publishing server, inspects local
//! containers and seals new ones. Results go to stdout; progress and
//! failures go to stderr.

use clap::Parser;
use release_channel_cli::cli::Cli;
use release_channel_cli::commands::run;
use release_channel_cli::error::Result;
use release_channel_cli::output::write_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            1
        }
    }
}
