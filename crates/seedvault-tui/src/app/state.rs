//! Application state

use std::path::PathBuf;
use std::time::Duration;

use seedvault_core::RevealView;
use tokio::sync::watch;
use zeroize::Zeroizing;

use crate::auth::{IdleTimer, PinAttempts};

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Masked PIN entry
    #[default]
    Unlock,

    /// Recovery phrase display
    RecoveryPhrase,
}

/// Application state
pub struct AppState {
    /// Current screen
    pub current_screen: Screen,

    /// PIN typed so far, wiped on drop
    pub pin_input: Zeroizing<String>,

    /// Whether a PIN check is running in the background
    pub unlocking: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Error message to display
    pub error_message: Option<String>,

    /// Word count recorded in the keystore, known after unlock
    pub word_count: Option<usize>,

    /// Keystore shown in the header
    pub keystore_path: PathBuf,

    /// Reveal controller updates
    pub reveal: watch::Receiver<RevealView>,

    /// Failed unlock tracking
    pub attempts: PinAttempts,

    /// Auto-lock timer for the phrase screen
    pub idle: IdleTimer,

    /// Whether copying is offered at all
    pub clipboard_enabled: bool,
}

impl AppState {
    /// Create new application state
    pub fn new(
        keystore_path: PathBuf,
        reveal: watch::Receiver<RevealView>,
        idle_lock: Duration,
    ) -> Self {
        Self {
            current_screen: Screen::Unlock,
            pin_input: Zeroizing::new(String::new()),
            unlocking: false,
            status_message: None,
            error_message: None,
            word_count: None,
            keystore_path,
            reveal,
            attempts: PinAttempts::default(),
            idle: IdleTimer::new(idle_lock),
            clipboard_enabled: true,
        }
    }

    /// Clear status messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}
