//! PIN-protected keystore holding the recovery phrase
//!
//! # Security Model
//!
//! - The phrase is encrypted at rest using ChaCha20-Poly1305
//! - Encryption key is derived from the PIN using Argon2id
//! - The derived key is kept in memory only while unlocked and is zeroized
//!   on lock or drop
//! - Every fetch re-reads and decrypts the file; no plaintext is cached

mod envelope;
mod pin;

pub use envelope::{Envelope, ENVELOPE_VERSION};
pub use pin::{validate_pin, MAX_PIN_LENGTH, MIN_PIN_LENGTH};

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::RngCore;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{AccessError, KeystoreError, Result};
use crate::secret::Secret;
use crate::wallet::WalletManager;
use pin::{derive_key, KEY_SIZE};

/// Keystore file name inside the data directory
const KEYSTORE_FILE_NAME: &str = "keystore.json";

/// Data directory name
const DATA_DIR_NAME: &str = "seedvault";

/// Wallet manager backed by an encrypted keystore file
pub struct KeystoreWallet {
    path: PathBuf,
    key: Mutex<Option<Zeroizing<[u8; KEY_SIZE]>>>,
}

impl KeystoreWallet {
    /// Open a keystore at `path`, locked
    ///
    /// The file is not touched until [`unlock`](Self::unlock).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: Mutex::new(None),
        }
    }

    /// Get the default keystore path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
            .join(KEYSTORE_FILE_NAME)
    }

    /// Seal a phrase into a new keystore
    ///
    /// The phrase must be a valid English BIP-39 mnemonic. Refuses to
    /// overwrite an existing keystore. The returned wallet is locked.
    pub fn create(path: impl Into<PathBuf>, phrase: &str, pin: &str) -> Result<Self> {
        let path = path.into();
        validate_pin(pin)?;

        if path.exists() {
            return Err(KeystoreError::AlreadyExists(path.display().to_string()));
        }

        let secret = Secret::parse(phrase);
        let normalized = Zeroizing::new(secret.phrase().to_lowercase());
        bip39::Mnemonic::parse_in_normalized(bip39::Language::English, &normalized)
            .map_err(|e| KeystoreError::InvalidPhrase(e.to_string()))?;

        let mut salt = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let key = derive_key(pin, &salt)?;

        Envelope::seal(&normalized, secret.len(), &salt, &key)?.save(&path)?;
        info!(word_count = secret.len(), "Created keystore at {:?}", path);

        Ok(Self::open(path))
    }

    /// Path of the keystore file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the keystore file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Number of words in the stored phrase, readable while locked
    pub fn word_count(&self) -> Result<usize> {
        Ok(Envelope::load(&self.path)?.word_count)
    }

    /// Derive the key from `pin` and keep it if it decrypts the keystore
    ///
    /// Blocking: Argon2id takes a noticeable amount of CPU. Call from
    /// `spawn_blocking` in async contexts.
    pub fn unlock(&self, pin: &str) -> Result<()> {
        validate_pin(pin)?;

        let envelope = Envelope::load(&self.path)?;
        let key = derive_key(pin, &envelope.salt()?)?;

        // Proves the PIN; the plaintext is dropped and wiped immediately.
        envelope.open(&key)?;

        *self.key.lock().unwrap_or_else(PoisonError::into_inner) = Some(key);
        debug!("Keystore unlocked");
        Ok(())
    }

    /// Forget the derived key
    pub fn lock(&self) {
        if self
            .key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            debug!("Keystore locked");
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn current_key(&self) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
        self.key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(KeystoreError::Locked)
    }
}

/// Read and decrypt the phrase with an already-verified key
fn load_phrase(path: &Path, key: &[u8; KEY_SIZE]) -> Result<Secret> {
    let envelope = Envelope::load(path)?;
    let phrase = envelope.open(key).map_err(|e| match e {
        KeystoreError::WrongPin => KeystoreError::Corrupted,
        other => other,
    })?;
    Ok(Secret::parse(&phrase))
}

#[async_trait]
impl WalletManager for KeystoreWallet {
    async fn get_mnemonic(&self) -> std::result::Result<Secret, AccessError> {
        let key = self.current_key()?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || load_phrase(&path, &key))
            .await
            .map_err(|e| AccessError::new(format!("keystore task failed: {}", e)))?
            .map_err(AccessError::from)
    }
}
