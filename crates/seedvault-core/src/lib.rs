//! Seedvault - Recovery phrase viewer core
//!
//! This crate provides the pieces behind the recovery phrase screen:
//! - A reveal controller that fetches the phrase on demand, tracks
//!   loading/error state and a timed clipboard acknowledgment
//! - The wallet manager abstraction it fetches from
//! - A PIN-protected encrypted keystore implementing that abstraction
//! - Clipboard sinks
//!
//! The phrase is never logged, serialized, or cached outside an active
//! reveal.

pub mod clipboard;
pub mod error;
pub mod keystore;
pub mod reveal;
pub mod secret;
pub mod wallet;

pub use clipboard::{ClipboardError, ClipboardSink, NullClipboard, Osc52Clipboard};
pub use error::{AccessError, KeystoreError, Result, RevealError};
pub use keystore::KeystoreWallet;
pub use reveal::{RevealState, RevealView, SecretRevealController, DEFAULT_COPY_ACK};
pub use secret::Secret;
pub use wallet::WalletManager;
