//! Trust-gated release-channel manifest resolution.
//!
//! A release channel (Production, Insider, Canary) publishes a manifest
//! container: a ZIP archive holding a UTF-16LE JSON resource and an Ed25519
//! signature. This crate verifies the container before reading anything
//! from it, decodes the manifest into a [`ReleaseInfo`], and resolves the
//! minimum version a client on that channel must run.
//!
//! Two entry points cover the two calling styles:
//!
//! - [`get_channel_from_stream`] decodes one stream and fails loudly with
//!   the opaque [`InvalidChannelData`] error;
//! - [`ChannelResolver::try_resolve`] (and [`try_get_channel_info`]) fetch
//!   through a [`ChannelSource`] and never fail: problems go to an optional
//!   [`FailureReporter`] and the caller sees `None`.
//!
//! # Examples
//!
//! ```
//! use ed25519_dalek::SigningKey;
//! use release_channel::{
//!     ChannelResolver, ChannelSource, ReleaseChannel, RetrievalError, RetrievalMetadata,
//!     SignedContainerVerifier, seal::seal_container,
//! };
//!
//! struct InMemory(Vec<u8>);
//!
//! impl ChannelSource for InMemory {
//!     fn load_channel_info(
//!         &self,
//!         _channel: ReleaseChannel,
//!         dest: &mut Vec<u8>,
//!     ) -> Result<RetrievalMetadata, RetrievalError> {
//!         dest.extend_from_slice(&self.0);
//!         Ok(RetrievalMetadata::new("memory"))
//!     }
//! }
//!
//! let key = SigningKey::from_bytes(&[1u8; 32]);
//! let container = seal_container(
//!     r#"{"current-version":"2.0.0","production-minimum-version":"1.5.0"}"#,
//!     &key,
//! )
//! .expect("sealed");
//! let source = InMemory(container);
//! let verifier = SignedContainerVerifier::new(vec![key.verifying_key()]);
//!
//! let info = ChannelResolver::new(&source, &verifier)
//!     .try_resolve(ReleaseChannel::Production)
//!     .expect("resolved");
//! assert_eq!(info.minimum_version().to_string(), "1.5.0");
//! ```

pub mod channel;
pub mod config;
pub mod decoder;
pub mod error;
pub mod keys;
pub mod metadata;
pub mod release;
pub mod reporter;
pub mod resolver;
pub mod resource;
pub mod seal;
pub mod source;
pub mod stream;
pub mod text;
pub mod trust;

pub use channel::{ReleaseChannel, UnknownChannel};
pub use config::{ConfigError, ResolverConfig, RetrievalConfig};
pub use decoder::{
    MANIFEST_RESOURCE_NAME, decode_manifest, decode_manifest_with, get_channel_from_stream,
};
pub use error::{ChannelInfoError, InvalidChannelData};
pub use metadata::RetrievalMetadata;
pub use release::{ChannelInfo, ReleaseInfo};
pub use reporter::{FailureReporter, LogReporter};
pub use resolver::{ChannelResolver, UntrustedPolicy, try_get_channel_info};
pub use source::{ChannelSource, RetrievalError};
pub use stream::ReadSeek;
pub use trust::{SignedContainerVerifier, TrustGate, TrustVerifier};
