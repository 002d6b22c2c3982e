//! [`EnvelopeCodec`]: seal text into prefixed AES-GCM tokens and open them again.
//!
//! # Token format
//!
//! ```text
//! <prefix><base64( 0x0C || nonce[12] || ciphertext || tag[16] )>
//! ```
//!
//! Associated data is bound into the tag but never stored in the token; the
//! caller must present the same bytes (or none) when opening.
//!
//! # Concurrency
//!
//! The codec holds nothing but an immutable key and prefix. Each call draws
//! its own nonce from the OS CSPRNG and builds its own cipher engine, so one
//! instance can be shared across threads without locking.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::envelope::{self, Envelope, DEFAULT_PREFIX, NONCE_LEN, TAG_LEN};
use common::{ConfigError, CryptoError};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::crypto::{AeadPrimitive, AesGcmPrimitive, KeyBytes};

/// Result of [`EnvelopeCodec::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened<'a> {
    /// The token was authenticated and decrypted.
    Decrypted(String),
    /// The input carried no token prefix and is returned unchanged.
    Passthrough(&'a str),
}

impl Opened<'_> {
    /// Borrow the recovered text.
    pub fn as_str(&self) -> &str {
        match self {
            Opened::Decrypted(s) => s,
            Opened::Passthrough(s) => s,
        }
    }

    /// Take the recovered text as an owned string.
    pub fn into_string(self) -> String {
        match self {
            Opened::Decrypted(s) => s,
            Opened::Passthrough(s) => s.to_owned(),
        }
    }

    /// Returns `true` if the input was not a token.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Opened::Passthrough(_))
    }
}

/// Authenticated envelope codec bound to one key and one token prefix.
pub struct EnvelopeCodec<P = AesGcmPrimitive> {
    key: KeyBytes,
    prefix: String,
    primitive: P,
}

impl EnvelopeCodec<AesGcmPrimitive> {
    /// Build an AES-GCM codec over a copy of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        Self::with_primitive(key, AesGcmPrimitive)
    }

    /// Build an AES-GCM codec from a base64-encoded key.
    ///
    /// # Errors
    ///
    /// See [`KeyBytes::from_base64`].
    pub fn from_base64_key(encoded: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_key(KeyBytes::from_base64(encoded)?, AesGcmPrimitive))
    }

    /// Build an AES-GCM codec from loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configured key is missing, not base64, or the wrong
    /// length, or if the configured prefix is unusable.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Self::from_base64_key(&cfg.key)?.with_prefix(&cfg.token_prefix)
    }
}

impl<P: AeadPrimitive> EnvelopeCodec<P> {
    /// Build a codec over a copy of `key` using a caller-supplied AEAD engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes.
    pub fn with_primitive(key: &[u8], primitive: P) -> Result<Self, ConfigError> {
        Ok(Self::from_key(KeyBytes::new(key)?, primitive))
    }

    fn from_key(key: KeyBytes, primitive: P) -> Self {
        debug!(key_bits = key.bits(), "envelope codec initialised");
        Self {
            key,
            prefix: DEFAULT_PREFIX.to_owned(),
            primitive,
        }
    }

    /// Replace the token prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] for an empty or non-printable prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        envelope::validate_prefix(prefix)?;
        self.prefix = prefix.to_owned();
        Ok(self)
    }

    /// The marker every sealed token starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Seal `plaintext` into a token, binding `aad` into the tag.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::EmptyInput`] if `plaintext` is empty.
    /// - [`CryptoError::SealFailed`] if the random source or AEAD engine fails.
    pub fn seal(&self, plaintext: &[u8], aad: Option<&[u8]>) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Err(reject(CryptoError::EmptyInput));
        }

        let mut nonce = Zeroizing::new([0u8; NONCE_LEN]);
        OsRng.try_fill_bytes(&mut nonce[..]).map_err(|e| {
            warn!(error = %e, "nonce generation failed");
            reject(CryptoError::SealFailed)
        })?;

        let sealed = self
            .primitive
            .encrypt(self.key.as_bytes(), &nonce, plaintext, aad.unwrap_or_default())
            .map(Zeroizing::new)
            .map_err(|e| {
                warn!(error = %e, "aead encryption failed");
                reject(CryptoError::SealFailed)
            })?;

        if sealed.len() != plaintext.len() + TAG_LEN {
            warn!(
                expected = plaintext.len() + TAG_LEN,
                actual = sealed.len(),
                "aead engine returned unexpected output length"
            );
            return Err(reject(CryptoError::SealFailed));
        }

        let framed = envelope::frame(&nonce, &sealed);
        Ok(envelope::encode_token(&self.prefix, &framed))
    }

    /// Open a token sealed by [`seal`](Self::seal) under the same key and `aad`.
    ///
    /// Input without the token prefix is returned unchanged as
    /// [`Opened::Passthrough`], so mixed encrypted and plain values can flow
    /// through the same call.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::EmptyInput`] if `token` is empty.
    /// - [`CryptoError::MalformedEnvelope`] if the body is not base64, too
    ///   short, or declares a nonce length other than 12.
    /// - [`CryptoError::AuthenticationFailed`] on tag mismatch: tampering, a
    ///   different key, or different associated data.
    /// - [`CryptoError::InvalidEncoding`] if the plaintext is not UTF-8.
    pub fn open<'t>(
        &self,
        token: &'t str,
        aad: Option<&[u8]>,
    ) -> Result<Opened<'t>, CryptoError> {
        if token.is_empty() {
            return Err(reject(CryptoError::EmptyInput));
        }
        let Some(body) = token.strip_prefix(self.prefix.as_str()) else {
            debug!("input carries no token prefix; passing through");
            return Ok(Opened::Passthrough(token));
        };

        let raw = envelope::decode_body(body).map_err(|d| reject(d.into()))?;
        let parsed = Envelope::parse(&raw).map_err(|d| reject(d.into()))?;

        let plaintext = self
            .primitive
            .decrypt(
                self.key.as_bytes(),
                parsed.nonce(),
                parsed.sealed(),
                aad.unwrap_or_default(),
            )
            .map(Zeroizing::new)
            .map_err(|e| {
                debug!(error = %e, "aead decryption failed");
                reject(CryptoError::AuthenticationFailed)
            })?;

        let text =
            std::str::from_utf8(&plaintext).map_err(|_| reject(CryptoError::InvalidEncoding))?;
        Ok(Opened::Decrypted(text.to_owned()))
    }

    /// [`seal`](Self::seal) a string with no associated data.
    ///
    /// # Errors
    ///
    /// See [`seal`](Self::seal).
    pub fn seal_str(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.seal(plaintext.as_bytes(), None)
    }

    /// [`open`](Self::open) a token with no associated data.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_str<'t>(&self, token: &'t str) -> Result<Opened<'t>, CryptoError> {
        self.open(token, None)
    }
}

impl<P> std::fmt::Debug for EnvelopeCodec<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeCodec")
            .field("key", &self.key)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

fn reject(err: CryptoError) -> CryptoError {
    warn!(stage = err.stage(), error = %err, "envelope operation rejected");
    err
}
