//! Envelope and token wire format.
//!
//! # Envelope
//!
//! ```text
//! [nonce_len:1][nonce:nonce_len][ciphertext || tag]
//! ```
//!
//! `nonce_len` is always 12. The byte exists so the format can grow, but any
//! other value is rejected as a structural defect.
//!
//! # Token
//!
//! ```text
//! <prefix><base64(envelope)>
//! ```
//!
//! Standard base64 alphabet with padding. Strings without the prefix are not
//! tokens and are passed through untouched by the codec.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroizing;

use crate::error::{ConfigError, EnvelopeDefect};

/// Byte length of a GCM nonce (96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest valid envelope: length byte, nonce, and a tag over empty ciphertext.
pub const MIN_ENVELOPE_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Marker that distinguishes sealed tokens from plain passthrough text.
pub const DEFAULT_PREFIX: &str = "$[[aescrypt]]$";

/// A borrowed, structurally validated view over a decoded envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    nonce: &'a [u8; NONCE_LEN],
    sealed: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split a decoded envelope into nonce and `ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeDefect::TooShort`] when `bytes` cannot hold a length
    /// byte, a nonce and a tag, and [`EnvelopeDefect::NonceLength`] when the
    /// declared nonce length is not [`NONCE_LEN`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self, EnvelopeDefect> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(EnvelopeDefect::TooShort(bytes.len()));
        }
        let declared = bytes[0];
        if usize::from(declared) != NONCE_LEN {
            return Err(EnvelopeDefect::NonceLength(declared));
        }
        let (nonce, sealed) = bytes[1..].split_at(NONCE_LEN);
        let nonce = nonce
            .try_into()
            .map_err(|_| EnvelopeDefect::TooShort(bytes.len()))?;
        Ok(Self { nonce, sealed })
    }

    /// The nonce the payload was sealed under.
    pub fn nonce(&self) -> &'a [u8; NONCE_LEN] {
        self.nonce
    }

    /// Ciphertext followed by the authentication tag.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }
}

/// Assemble `[12][nonce][ciphertext || tag]`.
///
/// The returned buffer is wiped when dropped.
pub fn frame(nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(1 + NONCE_LEN + sealed.len()));
    out.push(NONCE_LEN as u8);
    out.extend_from_slice(nonce);
    out.extend_from_slice(sealed);
    out
}

/// Render an envelope as `prefix ++ base64(envelope)`.
pub fn encode_token(prefix: &str, envelope: &[u8]) -> String {
    let mut token = String::with_capacity(prefix.len() + envelope.len().div_ceil(3) * 4);
    token.push_str(prefix);
    STANDARD.encode_string(envelope, &mut token);
    token
}

/// Decode the base64 body of a token (the part after the prefix).
///
/// # Errors
///
/// Returns [`EnvelopeDefect::Base64`] if `body` is not canonical standard base64.
pub fn decode_body(body: &str) -> Result<Zeroizing<Vec<u8>>, EnvelopeDefect> {
    STANDARD
        .decode(body)
        .map(Zeroizing::new)
        .map_err(|_| EnvelopeDefect::Base64)
}

/// Check that a token prefix is usable as a marker.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPrefix`] for an empty prefix or one with
/// characters outside printable ASCII.
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ConfigError::InvalidPrefix);
    }
    Ok(())
}
