//! Resolver configuration loaded from TOML.
//!
//! A configuration file names the trusted signing keys, whether untrusted
//! manifests should be reported, and where manifest containers are
//! published:
//!
//! ```toml
//! trusted_keys = ["8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c"]
//! report_untrusted = false
//!
//! [retrieval]
//! base_url = "https://updates.example.com/channels"
//! timeout_secs = 30
//! ```
//!
//! Every field is optional. Unknown fields are rejected so that typos do not
//! silently fall back to defaults.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

use crate::keys::{KeyError, parse_verifying_key};
use crate::resolver::UntrustedPolicy;
use crate::trust::SignedContainerVerifier;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or does not match the schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A trusted key is not a valid Ed25519 public key.
    #[error("invalid trusted key #{index}: {source}")]
    InvalidKey {
        /// Zero-based position of the key in `trusted_keys`.
        index: usize,
        /// Why the key was rejected.
        source: KeyError,
    },
}

/// Top-level resolver configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Hex-encoded Ed25519 public keys whose signatures are trusted.
    pub trusted_keys: Vec<String>,
    /// Whether untrusted manifests reach the failure reporter.
    pub report_untrusted: bool,
    /// Where manifest containers are fetched from.
    pub retrieval: RetrievalConfig,
}

impl ResolverConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML, unknown fields or
    /// mistyped values.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_channel::config::ResolverConfig;
    ///
    /// let config = ResolverConfig::from_toml_str("report_untrusted = true").expect("valid");
    /// assert!(config.report_untrusted);
    /// assert_eq!(config.retrieval.timeout_secs, 30);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it cannot be parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build the signed-container verifier for the configured keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] naming the first bad key.
    pub fn verifier(&self) -> Result<SignedContainerVerifier, ConfigError> {
        let keys = self
            .trusted_keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                parse_verifying_key(key)
                    .map_err(|source| ConfigError::InvalidKey { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SignedContainerVerifier::new(keys))
    }

    /// Return the configured untrusted-manifest policy.
    #[must_use]
    pub const fn untrusted_policy(&self) -> UntrustedPolicy {
        UntrustedPolicy::from_flag(self.report_untrusted)
    }
}

/// Settings for fetching manifest containers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Base URL; containers live at `{base_url}/{channel}/ReleaseInfo.zip`.
    pub base_url: Option<String>,
    /// Global request timeout in seconds.
    #[serde(default = "RetrievalConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RetrievalConfig {
    const fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rstest::rstest;

    fn public_key_hex(seed: u8) -> String {
        hex::encode(SigningKey::from_bytes(&[seed; 32]).verifying_key().as_bytes())
    }

    #[rstest]
    fn defaults_are_conservative() {
        let config = ResolverConfig::from_toml_str("").expect("empty config is valid");
        assert!(config.trusted_keys.is_empty());
        assert!(!config.report_untrusted);
        assert_eq!(config.untrusted_policy(), UntrustedPolicy::Silent);
        assert_eq!(config.retrieval, RetrievalConfig::default());
        assert_eq!(config.retrieval.timeout_secs, 30);
    }

    #[rstest]
    fn deserialises_full_configuration() {
        let text = format!(
            r#"
            trusted_keys = ["{}"]
            report_untrusted = true

            [retrieval]
            base_url = "https://updates.example.test/channels"
            timeout_secs = 5
            "#,
            public_key_hex(1)
        );
        let config = ResolverConfig::from_toml_str(&text).expect("valid config");

        assert_eq!(config.untrusted_policy(), UntrustedPolicy::Report);
        assert_eq!(
            config.retrieval.base_url.as_deref(),
            Some("https://updates.example.test/channels")
        );
        assert_eq!(config.retrieval.timeout_secs, 5);
        assert_eq!(config.verifier().expect("valid keys").trusted_keys().len(), 1);
    }

    #[rstest]
    #[case::top_level("trusted_key = []")]
    #[case::retrieval("[retrieval]\nbaseurl = \"x\"")]
    fn rejects_unknown_fields(#[case] text: &str) {
        let result = ResolverConfig::from_toml_str(text);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn rejects_mistyped_values() {
        let result = ResolverConfig::from_toml_str("report_untrusted = \"yes\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn verifier_names_the_bad_key() {
        let config = ResolverConfig {
            trusted_keys: vec![public_key_hex(1), "not-hex".to_owned()],
            ..ResolverConfig::default()
        };
        let err = config.verifier().expect_err("second key is invalid");
        assert!(matches!(
            err,
            ConfigError::InvalidKey {
                index: 1,
                source: KeyError::InvalidHex { .. }
            }
        ));
    }

    #[rstest]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.toml"))
            .expect("utf-8 temp path");
        let result = ResolverConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Io { path: ref p, .. }) if *p == path));
    }
}
