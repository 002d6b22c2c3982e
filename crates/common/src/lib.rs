//! Common types, wire format definitions, and errors shared across `aescrypt` crates.

pub mod envelope;
pub mod error;

pub use envelope::Envelope;
pub use error::{ConfigError, CryptoError, EnvelopeDefect};
