//! Wallet manager abstraction
//!
//! The reveal controller never touches key material directly. It asks a
//! wallet manager for the phrase, and the manager decides where it comes from
//! (encrypted keystore, hardware device, remote signer).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AccessError;
use crate::secret::Secret;

/// Source of the wallet's recovery phrase
#[async_trait]
pub trait WalletManager: Send + Sync {
    /// Fetch the recovery phrase
    ///
    /// May suspend for an arbitrary time (key derivation, device prompts).
    async fn get_mnemonic(&self) -> Result<Secret, AccessError>;
}

#[async_trait]
impl<T: WalletManager + ?Sized> WalletManager for Arc<T> {
    async fn get_mnemonic(&self) -> Result<Secret, AccessError> {
        (**self).get_mnemonic().await
    }
}
