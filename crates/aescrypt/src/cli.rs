//! Command-line surface of the `aescrypt` binary.
//!
//! ```text
//! aescrypt keygen
//! aescrypt seal <plaintext> [--aad <text>]
//! aescrypt open <token> [--aad <text>]
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::codec::EnvelopeCodec;
use crate::config::Config;
use crate::crypto::generate_key;

/// aescrypt: seal text into AES-GCM tokens and open them again
#[derive(Parser, Debug)]
#[command(name = "aescrypt", version)]
#[command(about = "Seal text into AES-GCM tokens and open them again")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// A parsed command.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a fresh base64 128-bit key
    Keygen,

    /// Seal plaintext into a token
    Seal {
        /// Text to seal
        plaintext: String,

        /// Associated data bound into the tag
        #[arg(long)]
        aad: Option<String>,
    },

    /// Open a token; input without the token prefix is echoed back
    Open {
        /// Token to open
        token: String,

        /// Associated data the token was sealed with
        #[arg(long)]
        aad: Option<String>,
    },
}

impl Command {
    /// Execute the command and return what should be written to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key is unusable or the codec
    /// rejects the input.
    pub fn run(&self, cfg: &Config) -> Result<String> {
        match self {
            Command::Keygen => {
                info!("generated new 128-bit key");
                Ok(generate_key())
            }
            Command::Seal { plaintext, aad } => {
                let codec = EnvelopeCodec::from_config(cfg).context("invalid key configuration")?;
                let token = codec
                    .seal(plaintext.as_bytes(), aad.as_deref().map(str::as_bytes))
                    .context("seal failed")?;
                info!(aad = aad.is_some(), "payload sealed");
                Ok(token)
            }
            Command::Open { token, aad } => {
                let codec = EnvelopeCodec::from_config(cfg).context("invalid key configuration")?;
                let opened = codec
                    .open(token, aad.as_deref().map(str::as_bytes))
                    .context("open failed")?;
                info!(passthrough = opened.is_passthrough(), "token opened");
                Ok(opened.into_string())
            }
        }
    }
}
