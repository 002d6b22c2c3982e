//! AES-GCM encryption and decryption behind the [`AeadPrimitive`] seam.
//!
//! **Nonce discipline:** GCM nonce reuse under one key is catastrophic, as it
//! breaks both confidentiality and authentication. This layer never picks a
//! nonce; callers must supply a fresh random one per seal.

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit, Payload},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use common::envelope::{NONCE_LEN, TAG_LEN};
use thiserror::Error;

/// AES-192 in GCM mode with a 96-bit nonce and a 128-bit tag.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Errors produced by an AEAD primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The engine does not accept a key of this length.
    #[error("unsupported key length: {0} bytes")]
    UnsupportedKey(usize),

    /// The authentication tag did not verify.
    #[error("authentication tag mismatch")]
    TagMismatch,

    /// Any other engine-level failure.
    #[error("aead operation failed")]
    Failure,
}

/// An authenticated cipher with 96-bit nonces and an appended 128-bit tag.
///
/// `encrypt` returns `ciphertext || tag`, `plaintext.len() + 16` bytes long.
/// `decrypt` takes the same layout back and fails with
/// [`PrimitiveError::TagMismatch`] if the tag does not verify.
#[cfg_attr(test, mockall::automock)]
pub trait AeadPrimitive {
    /// Seal `plaintext`, binding `aad` into the tag.
    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;

    /// Verify and open `ciphertext || tag`.
    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        sealed: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;
}

/// AES-GCM over 128, 192 or 256-bit keys, selected by key length.
///
/// Stateless: every call expands the key into its own engine, so concurrent
/// calls never share cipher state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmPrimitive;

impl AeadPrimitive for AesGcmPrimitive {
    fn encrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        let payload = Payload { msg: plaintext, aad };
        Engine::new(key)?
            .encrypt(Nonce::<U12>::from_slice(nonce), payload)
            .map_err(|_| PrimitiveError::Failure)
    }

    fn decrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        sealed: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        if sealed.len() < TAG_LEN {
            return Err(PrimitiveError::Failure);
        }
        let payload = Payload { msg: sealed, aad };
        Engine::new(key)?
            .decrypt(Nonce::<U12>::from_slice(nonce), payload)
            .map_err(|_| PrimitiveError::TagMismatch)
    }
}

/// A per-call cipher handle.
enum Engine {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Engine {
    fn new(key: &[u8]) -> Result<Self, PrimitiveError> {
        let engine = match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256),
            n => return Err(PrimitiveError::UnsupportedKey(n)),
        };
        engine.map_err(|_| PrimitiveError::UnsupportedKey(key.len()))
    }

    fn encrypt(&self, nonce: &Nonce<U12>, payload: Payload<'_, '_>) -> aes_gcm::aead::Result<Vec<u8>> {
        match self {
            Self::Aes128(c) => c.encrypt(nonce, payload),
            Self::Aes192(c) => c.encrypt(nonce, payload),
            Self::Aes256(c) => c.encrypt(nonce, payload),
        }
    }

    fn decrypt(&self, nonce: &Nonce<U12>, payload: Payload<'_, '_>) -> aes_gcm::aead::Result<Vec<u8>> {
        match self {
            Self::Aes128(c) => c.decrypt(nonce, payload),
            Self::Aes192(c) => c.decrypt(nonce, payload),
            Self::Aes256(c) => c.decrypt(nonce, payload),
        }
    }
}
