//! Error types for Seedvault

use thiserror::Error;

/// Result type alias for keystore operations
pub type Result<T> = std::result::Result<T, KeystoreError>;

/// Failure reported by a wallet manager when the recovery phrase cannot be
/// retrieved.
///
/// The message is shown to the user verbatim, so it must never contain any
/// part of the secret itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AccessError {
    message: String,
}

impl AccessError {
    /// Create an access error with a human-readable message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message surfaced to the user
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Misuse of the reveal controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// An operation that needs the phrase was invoked while it is not shown
    #[error("Recovery phrase is not revealed")]
    NotRevealed,
}

/// Errors that can occur in keystore operations
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No keystore file at the configured path
    #[error("Keystore not found - run 'seedvault import' first")]
    NotInitialized,

    /// Keystore already exists and would be overwritten
    #[error("Keystore already exists at {0}")]
    AlreadyExists(String),

    /// Keystore has not been unlocked with a PIN
    #[error("Keystore is locked")]
    Locked,

    /// PIN does not decrypt the keystore
    #[error("Incorrect PIN")]
    WrongPin,

    /// Ciphertext failed authentication under an otherwise valid key
    #[error("Keystore is corrupted")]
    Corrupted,

    /// Unsupported envelope version
    #[error("Unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    #[error("PIN must be {0}-{1} digits")]
    InvalidPinLength(usize, usize),

    #[error("PIN must contain only digits")]
    InvalidPinFormat,

    /// Phrase failed BIP-39 validation
    #[error("Invalid recovery phrase: {0}")]
    InvalidPhrase(String),

    /// Cryptographic error
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<serde_json::Error> for KeystoreError {
    fn from(e: serde_json::Error) -> Self {
        KeystoreError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for KeystoreError {
    fn from(e: hex::FromHexError) -> Self {
        KeystoreError::Serialization(e.to_string())
    }
}

impl From<KeystoreError> for AccessError {
    fn from(e: KeystoreError) -> Self {
        let message = match e {
            KeystoreError::Locked => "wallet is locked".to_string(),
            KeystoreError::NotInitialized => "wallet not initialized".to_string(),
            KeystoreError::Io(io) => format!("keystore I/O failure: {}", io),
            KeystoreError::WrongPin
            | KeystoreError::Corrupted
            | KeystoreError::Serialization(_)
            | KeystoreError::UnsupportedVersion(_) => "keystore is corrupted".to_string(),
            other => other.to_string(),
        };
        AccessError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_displays_message_verbatim() {
        let err = AccessError::new("locked");
        assert_eq!(err.to_string(), "locked");
        assert_eq!(err.message(), "locked");
    }

    #[test]
    fn test_keystore_error_to_access_error() {
        assert_eq!(
            AccessError::from(KeystoreError::Locked).message(),
            "wallet is locked"
        );
        assert_eq!(
            AccessError::from(KeystoreError::NotInitialized).message(),
            "wallet not initialized"
        );

        assert_eq!(
            AccessError::from(KeystoreError::Serialization("EOF".to_string())).message(),
            "keystore is corrupted"
        );
        assert_eq!(
            AccessError::from(KeystoreError::UnsupportedVersion(9)).message(),
            "keystore is corrupted"
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            AccessError::from(KeystoreError::Io(io)).message(),
            "keystore I/O failure: denied"
        );
    }
}
