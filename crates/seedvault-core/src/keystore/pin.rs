//! PIN validation and key derivation
//!
//! The keystore key is derived from the PIN with Argon2id. The PIN itself is
//! never stored; a wrong PIN simply yields a key that fails AEAD
//! authentication.

use argon2::Argon2;
use zeroize::Zeroizing;

use crate::error::{KeystoreError, Result};

/// Minimum PIN length
pub const MIN_PIN_LENGTH: usize = 6;
/// Maximum PIN length
pub const MAX_PIN_LENGTH: usize = 12;

/// Size of the derived key and of the KDF salt
pub(crate) const KEY_SIZE: usize = 32;

/// Validate PIN format
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() < MIN_PIN_LENGTH || pin.len() > MAX_PIN_LENGTH {
        return Err(KeystoreError::InvalidPinLength(MIN_PIN_LENGTH, MAX_PIN_LENGTH));
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(KeystoreError::InvalidPinFormat);
    }

    Ok(())
}

/// Derive the keystore encryption key from PIN and salt
pub(crate) fn derive_key(pin: &str, salt: &[u8; KEY_SIZE]) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    let pin_bytes = Zeroizing::new(pin.as_bytes().to_vec());

    Argon2::default()
        .hash_password_into(&pin_bytes, salt, &mut key[..])
        .map_err(|e| KeystoreError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}
