//! Telemetry initialisation for the `aescrypt` binary.
//!
//! Structured JSON logs only, written to stderr so command output on stdout
//! stays machine-readable.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext, ciphertext or associated data** may appear
//!   in any log field. Codec logs carry stage names and lengths only.
//! - Log level is configurable via `AESCRYPT_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
