//! Release channel client library.
//!
//! This crate backs the `release-channel` binary: it fetches manifest
//! containers over HTTP, decodes local containers and seals manifests for
//! publication. Commands write to caller-supplied streams so they can be
//! driven from tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Command implementations
//! - [`error`] - CLI error type
//! - [`http`] - HTTP channel source built on `ureq`
//! - [`output`] - Summary rendering and the stream failure reporter

pub mod cli;
pub mod commands;
pub mod error;
pub mod http;
pub mod output;
