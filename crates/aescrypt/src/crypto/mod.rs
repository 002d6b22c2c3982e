//! AES-GCM primitives and key material.
//!
//! This module knows nothing about tokens or prefixes. It provides the
//! low-level seal/open operations and the codec-owned key buffer used by
//! [`crate::codec`].
//!
//! # Key sizes
//!
//! 16, 24 and 32 byte keys select AES-128-GCM, AES-192-GCM and AES-256-GCM.
//! All variants use a 96-bit nonce and a 128-bit tag (NIST SP 800-38D).

pub mod cipher;
pub mod key;

pub use cipher::{AeadPrimitive, AesGcmPrimitive, PrimitiveError};
pub use key::{generate_key, KeyBytes, GENERATED_KEY_LEN, KEY_LENS};
