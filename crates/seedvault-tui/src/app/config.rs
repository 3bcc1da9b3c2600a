//! Configuration persistence
//!
//! Saves and loads user preferences such as the keystore location and
//! clipboard behaviour.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use seedvault_core::KeystoreWallet;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "seedvault";

/// Configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Encrypted keystore holding the recovery phrase
    #[serde(default = "KeystoreWallet::default_path")]
    pub keystore_path: PathBuf,

    /// Seconds the "copied" acknowledgment stays visible
    #[serde(default = "default_copy_ack_secs")]
    pub copy_ack_secs: u64,

    /// Seconds without a key press before the phrase is hidden and the
    /// keystore locked
    #[serde(default = "default_idle_lock_secs")]
    pub idle_lock_secs: u64,

    /// How copied text reaches the system clipboard
    #[serde(default)]
    pub clipboard: ClipboardMode,

    /// Log file used while the terminal interface is active
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

/// Clipboard transport
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardMode {
    /// OSC 52 escape sequence written to the terminal
    #[default]
    Osc52,
    /// Copying is turned off
    Disabled,
}

fn default_copy_ack_secs() -> u64 {
    2
}

fn default_idle_lock_secs() -> u64 {
    120
}

fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("seedvault.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keystore_path: KeystoreWallet::default_path(),
            copy_ack_secs: default_copy_ack_secs(),
            idle_lock_secs: default_idle_lock_secs(),
            clipboard: ClipboardMode::Osc52,
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is an error so the caller can report it once logging is up.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Copy acknowledgment duration
    pub fn copy_ack(&self) -> Duration {
        Duration::from_secs(self.copy_ack_secs)
    }

    /// Idle period before auto-lock
    pub fn idle_lock(&self) -> Duration {
        Duration::from_secs(self.idle_lock_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid config file: {0}")]
    Parse(String),
}
