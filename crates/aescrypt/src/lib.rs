//! `aescrypt`: an AES-GCM authenticated envelope codec.
//!
//! Text payloads are sealed into self-describing tokens of the form
//! `<prefix><base64(envelope)>` and opened again with the same key and
//! associated data. Strings without the prefix pass through `open` untouched.
//!
//! ```no_run
//! use aescrypt::EnvelopeCodec;
//!
//! let codec = EnvelopeCodec::from_base64_key("AAAAAAAAAAAAAAAAAAAAAA==")?;
//! let token = codec.seal(b"hello", Some(b"meta".as_slice()))?;
//! assert_eq!(codec.open(&token, Some(b"meta".as_slice()))?.as_str(), "hello");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod telemetry;

pub use codec::{EnvelopeCodec, Opened};
pub use common::{envelope, ConfigError, CryptoError, EnvelopeDefect};
pub use config::Config;
pub use crypto::generate_key;
