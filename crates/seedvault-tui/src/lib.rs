//! Seedvault TUI Library
//!
//! Terminal interface for unlocking a keystore and viewing or copying the
//! wallet recovery phrase it holds.

pub mod app;
pub mod auth;
pub mod prompt;
pub mod ui;
pub mod utils;

pub use app::{App, AppConfig};
