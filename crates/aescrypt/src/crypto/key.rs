//! [`KeyBytes`]: codec-owned AES key material.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::ConfigError;
use zeroize::{Zeroize, Zeroizing};

/// Accepted key lengths in bytes (AES-128, AES-192, AES-256).
pub const KEY_LENS: [usize; 3] = [16, 24, 32];

/// Byte length of keys produced by [`generate_key`].
pub const GENERATED_KEY_LEN: usize = 16;

/// Heap buffer holding a validated AES key.
///
/// The bytes are copied in at construction so the key's lifetime is bounded
/// by the owner of this value, not by the caller's buffer. When dropped, the
/// memory is overwritten with zeroes.
pub struct KeyBytes(Box<[u8]>);

impl KeyBytes {
    /// Copy `key` into codec-owned storage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        if !KEY_LENS.contains(&key.len()) {
            return Err(ConfigError::InvalidKeyLength(key.len()));
        }
        Ok(Self(key.into()))
    }

    /// Decode a base64 key as delivered by configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingKey`] if `encoded` is blank.
    /// - [`ConfigError::InvalidKeyEncoding`] if it is not standard base64.
    /// - [`ConfigError::InvalidKeyLength`] if the decoded length is unsupported.
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        if encoded.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        let decoded = STANDARD
            .decode(encoded)
            .map(Zeroizing::new)
            .map_err(|_| ConfigError::InvalidKeyEncoding)?;
        Self::new(&decoded)
    }

    /// Raw key bytes, for handing to the AEAD primitive.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key strength in bits: 128, 192 or 256.
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("KeyBytes([REDACTED])")
    }
}

/// Generate a fresh 128-bit key from the OS CSPRNG, base64-encoded.
///
/// Intended for out-of-band provisioning; the result is what
/// [`KeyBytes::from_base64`] expects.
pub fn generate_key() -> String {
    let mut key = Zeroizing::new([0u8; GENERATED_KEY_LEN]);
    OsRng.fill_bytes(&mut key[..]);
    STANDARD.encode(&key[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_lengths() {
        for len in KEY_LENS {
            let key = KeyBytes::new(&vec![0x42u8; len]).unwrap();
            assert_eq!(key.as_bytes().len(), len);
            assert_eq!(key.bits(), len * 8);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        for len in [0usize, 15, 17, 23, 25, 31, 33, 64] {
            assert_eq!(
                KeyBytes::new(&vec![0u8; len]).unwrap_err(),
                ConfigError::InvalidKeyLength(len)
            );
        }
    }

    #[test]
    fn copies_caller_buffer() {
        let mut caller = vec![0x11u8; 16];
        let key = KeyBytes::new(&caller).unwrap();
        caller.iter_mut().for_each(|b| *b = 0);
        assert_eq!(key.as_bytes(), &[0x11u8; 16]);
    }

    #[test]
    fn from_base64_decodes_zero_key() {
        let key = KeyBytes::from_base64("AAAAAAAAAAAAAAAAAAAAAA==").unwrap();
        assert_eq!(key.as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn from_base64_rejects_blank() {
        assert_eq!(KeyBytes::from_base64("").unwrap_err(), ConfigError::MissingKey);
        assert_eq!(KeyBytes::from_base64("   ").unwrap_err(), ConfigError::MissingKey);
    }

    #[test]
    fn from_base64_rejects_bad_encoding() {
        assert_eq!(
            KeyBytes::from_base64("not*base64").unwrap_err(),
            ConfigError::InvalidKeyEncoding
        );
    }

    #[test]
    fn from_base64_does_not_strip_whitespace() {
        for padded in [
            " AAAAAAAAAAAAAAAAAAAAAA==",
            "AAAAAAAAAAAAAAAAAAAAAA==\n",
            "\tAAAAAAAAAAAAAAAAAAAAAA== ",
        ] {
            assert_eq!(
                KeyBytes::from_base64(padded).unwrap_err(),
                ConfigError::InvalidKeyEncoding
            );
        }
    }

    #[test]
    fn from_base64_rejects_bad_length() {
        // 15 zero bytes
        assert_eq!(
            KeyBytes::from_base64("AAAAAAAAAAAAAAAAAAAA").unwrap_err(),
            ConfigError::InvalidKeyLength(15)
        );
    }

    #[test]
    fn generated_key_is_128_bits() {
        let encoded = generate_key();
        let decoded = STANDARD.decode(&encoded).unwrap();
        assert_eq!(decoded.len(), GENERATED_KEY_LEN);
        assert!(KeyBytes::from_base64(&encoded).is_ok());
        assert_ne!(generate_key(), encoded);
    }

    #[test]
    fn key_bytes_redacted_in_debug() {
        let key = KeyBytes::new(&[0xFFu8; 32]).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("255"));
    }
}
