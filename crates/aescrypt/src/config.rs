//! Configuration loading and validation for `aescrypt`.
//!
//! All values are read from `AESCRYPT_*` environment variables. The key itself
//! is optional at load time (key generation needs none) and is decoded and
//! length-checked when a codec is built from the config.

use anyhow::{Context, Result};
use common::envelope::{validate_prefix, DEFAULT_PREFIX};
use serde::Deserialize;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "AESCRYPT";

/// Validated `aescrypt` configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64-encoded 16, 24 or 32 byte AES key (`AESCRYPT_KEY`).
    #[serde(default)]
    pub key: String,

    /// Marker prepended to every sealed token (`AESCRYPT_TOKEN_PREFIX`).
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_token_prefix() -> String {
    DEFAULT_PREFIX.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        validate_prefix(&self.token_prefix).context("AESCRYPT_TOKEN_PREFIX is invalid")?;
        if self.log_level.trim().is_empty() {
            anyhow::bail!("AESCRYPT_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key: String::new(),
            token_prefix: default_token_prefix(),
            log_level: default_log_level(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &if self.key.is_empty() { "<unset>" } else { "[REDACTED]" })
            .field("token_prefix", &self.token_prefix)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_token_prefix(), "$[[aescrypt]]$");
        assert_eq!(default_log_level(), "info");
        let cfg = Config::default();
        assert!(cfg.key.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn loads_from_prefixed_variables() {
        let cfg = Config::load(env(&[
            ("AESCRYPT_KEY", "AAAAAAAAAAAAAAAAAAAAAA=="),
            ("AESCRYPT_TOKEN_PREFIX", "enc:"),
            ("AESCRYPT_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.key, "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(cfg.token_prefix, "enc:");
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let cfg = Config::load(env(&[])).unwrap();
        assert!(cfg.key.is_empty());
        assert_eq!(cfg.token_prefix, DEFAULT_PREFIX);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn validate_rejects_bad_prefix() {
        let cfg = Config {
            token_prefix: "with space".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            log_level: " ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn key_redacted_in_debug() {
        let cfg = Config {
            key: "c2VjcmV0c2VjcmV0c2VjcmV0".into(),
            ..Config::default()
        };
        let printed = format!("{cfg:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("c2VjcmV0"));
    }
}
