//! On-disk keystore envelope
//!
//! The phrase is encrypted with ChaCha20-Poly1305 under a key derived from
//! the PIN (see [`super::pin`]). The file is JSON:
//!
//! - `version`: format version, currently 1
//! - `kdf_salt`: 32-byte Argon2id salt, hex
//! - `nonce`: 12-byte AEAD nonce, hex
//! - `ciphertext`: encrypted phrase plus 16-byte tag, hex
//! - `word_count`: number of words, so status can be shown while locked

use std::fs;
use std::io::Write;
use std::path::Path;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::pin::KEY_SIZE;
use crate::error::{KeystoreError, Result};

/// Current envelope version
pub const ENVELOPE_VERSION: u32 = 1;

/// Size of the nonce for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Encrypted keystore file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub kdf_salt: String,
    pub nonce: String,
    pub ciphertext: String,
    pub word_count: usize,
}

impl Envelope {
    /// Encrypt `phrase` under `key`
    pub fn seal(
        phrase: &str,
        word_count: usize,
        kdf_salt: &[u8; KEY_SIZE],
        key: &[u8; KEY_SIZE],
    ) -> Result<Self> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|e| KeystoreError::Crypto(format!("Invalid key: {}", e)))?;

        let ciphertext = cipher
            .encrypt(nonce, phrase.as_bytes())
            .map_err(|e| KeystoreError::Crypto(format!("Encryption failed: {}", e)))?;

        Ok(Self {
            version: ENVELOPE_VERSION,
            kdf_salt: hex::encode(kdf_salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
            word_count,
        })
    }

    /// Decrypt the phrase
    ///
    /// An authentication failure is reported as [`KeystoreError::WrongPin`];
    /// callers that already proved the key correct map it to corruption.
    pub fn open(&self, key: &[u8; KEY_SIZE]) -> Result<Zeroizing<String>> {
        if self.version != ENVELOPE_VERSION {
            return Err(KeystoreError::UnsupportedVersion(self.version));
        }

        let nonce_bytes = hex::decode(&self.nonce)?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(KeystoreError::Serialization(
                "Invalid nonce length".to_string(),
            ));
        }
        let ciphertext = hex::decode(&self.ciphertext)?;

        let cipher = ChaCha20Poly1305::new_from_slice(key)
            .map_err(|e| KeystoreError::Crypto(format!("Invalid key: {}", e)))?;

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
                .map_err(|_| KeystoreError::WrongPin)?,
        );

        let phrase = std::str::from_utf8(&plaintext)
            .map_err(|_| KeystoreError::Corrupted)?
            .to_string();

        Ok(Zeroizing::new(phrase))
    }

    /// Decode the KDF salt
    pub fn salt(&self) -> Result<[u8; KEY_SIZE]> {
        hex::decode(&self.kdf_salt)?
            .try_into()
            .map_err(|_| KeystoreError::Serialization("Invalid salt length".to_string()))
    }

    /// Read an envelope from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KeystoreError::NotInitialized);
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the envelope atomically with owner-only permissions
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        write_private(&temp_path, contents.as_bytes())?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

/// Write `contents` to a file readable only by the owner
///
/// The mode is set before any byte is written, including when a stale file
/// is being overwritten.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const KEY: [u8; KEY_SIZE] = [42u8; KEY_SIZE];
    const SALT: [u8; KEY_SIZE] = [1u8; KEY_SIZE];

    #[test]
    fn test_seal_and_open() {
        let envelope = Envelope::seal("alpha beta gamma", 3, &SALT, &KEY).unwrap();
        assert_eq!(envelope.word_count, 3);
        assert!(!envelope.ciphertext.contains(&hex::encode("alpha")));

        let phrase = envelope.open(&KEY).unwrap();
        assert_eq!(phrase.as_str(), "alpha beta gamma");
        assert_eq!(envelope.salt().unwrap(), SALT);
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope = Envelope::seal("alpha beta gamma", 3, &SALT, &KEY).unwrap();
        let result = envelope.open(&[99u8; KEY_SIZE]);
        assert!(matches!(result, Err(KeystoreError::WrongPin)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut envelope = Envelope::seal("alpha", 1, &SALT, &KEY).unwrap();
        envelope.version = 7;
        assert!(matches!(
            envelope.open(&KEY),
            Err(KeystoreError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("keystore.json");

        let envelope = Envelope::seal("alpha beta", 2, &SALT, &KEY).unwrap();
        envelope.save(&path).unwrap();

        let loaded = Envelope::load(&path).unwrap();
        assert_eq!(loaded.ciphertext, envelope.ciphertext);
        assert_eq!(loaded.open(&KEY).unwrap().as_str(), "alpha beta");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_tightens_stale_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("keystore.json.tmp");
        fs::write(&path, "stale contents that are longer").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("keystore.json");

        let envelope = Envelope::seal("alpha", 1, &SALT, &KEY).unwrap();
        envelope.save(&path).unwrap();
        envelope.save(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = Envelope::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(KeystoreError::NotInitialized)));
    }
}
