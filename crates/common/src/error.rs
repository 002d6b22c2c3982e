//! Common error types shared across crates.
//!
//! None of the messages produced here may contain key, plaintext, ciphertext
//! or associated-data bytes. Only lengths and stage names are recorded.

use thiserror::Error;

use crate::envelope::NONCE_LEN;

/// Construction-time errors.
///
/// A codec that fails with one of these is never built, so no seal or open
/// call can run against a rejected key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No key was configured, or the configured value is blank.
    #[error("encryption key is missing")]
    MissingKey,

    /// The configured key is not valid standard base64.
    #[error("encryption key must be a valid base64 string")]
    InvalidKeyEncoding,

    /// The decoded key is not 16, 24 or 32 bytes long.
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The token prefix is empty or contains non-printable / non-ASCII characters.
    #[error("token prefix must be non-empty printable ASCII")]
    InvalidPrefix,
}

/// Structural defects found while decoding a token body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvelopeDefect {
    /// The token body is not valid standard base64.
    #[error("token body is not valid base64")]
    Base64,

    /// The decoded envelope is shorter than length byte + nonce + tag.
    #[error("envelope too short: {0} bytes")]
    TooShort(usize),

    /// The declared nonce length byte is not the only supported value.
    #[error("unexpected nonce length {0}, expected {NONCE_LEN}")]
    NonceLength(u8),
}

/// Call-time errors returned by seal and open.
///
/// Each call is independent: returning one of these never affects later calls
/// on the same codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The plaintext or token was empty.
    #[error("the received data is invalid: input is empty")]
    EmptyInput,

    /// The token carried the prefix but its body could not be framed.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeDefect),

    /// Tag verification failed: tampered data, wrong key, or mismatched associated data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The authenticated plaintext is not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    InvalidEncoding,

    /// The AEAD engine or the random source failed while sealing.
    #[error("could not seal the data")]
    SealFailed,
}

impl CryptoError {
    /// Name of the processing stage that produced this error, for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            CryptoError::EmptyInput => "input",
            CryptoError::MalformedEnvelope(_) => "envelope",
            CryptoError::AuthenticationFailed => "authenticate",
            CryptoError::InvalidEncoding => "decode",
            CryptoError::SealFailed => "seal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages() {
        assert_eq!(CryptoError::EmptyInput.stage(), "input");
        assert_eq!(
            CryptoError::MalformedEnvelope(EnvelopeDefect::Base64).stage(),
            "envelope"
        );
        assert_eq!(CryptoError::AuthenticationFailed.stage(), "authenticate");
        assert_eq!(CryptoError::InvalidEncoding.stage(), "decode");
        assert_eq!(CryptoError::SealFailed.stage(), "seal");
    }

    #[test]
    fn defect_converts_into_malformed_envelope() {
        let e: CryptoError = EnvelopeDefect::NonceLength(16).into();
        assert_eq!(e, CryptoError::MalformedEnvelope(EnvelopeDefect::NonceLength(16)));
        assert!(e.to_string().contains("unexpected nonce length 16"));
    }

    #[test]
    fn key_length_message_carries_only_the_length() {
        let e = ConfigError::InvalidKeyLength(15);
        assert_eq!(
            e.to_string(),
            "invalid key length: expected 16, 24 or 32 bytes, got 15"
        );
    }
}
