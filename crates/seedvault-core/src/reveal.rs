//! Recovery phrase reveal controller
//!
//! Drives the lifecycle of showing the phrase on screen:
//!
//! ```text
//! Hidden ──reveal()──> Loading ──ok──> Revealed
//!   ^                     │
//!   │                     └──err──> Failed ──reveal()──> Loading
//!   └──────────── reset() from any state
//! ```
//!
//! Observers subscribe to a [`watch`] channel of [`RevealView`]. Every
//! transition is a single update of that channel, so no observer ever sees a
//! half-applied state.
//!
//! Each fetch and each copy acknowledgment is tagged with a request id. A
//! fetch that completes after `reset()` (or after a newer reveal) no longer
//! matches the current id and its result is dropped. Likewise only the timer
//! of the most recent copy may clear the acknowledgment flag.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardSink;
use crate::error::{AccessError, RevealError};
use crate::secret::Secret;
use crate::wallet::WalletManager;

/// How long the "copied" acknowledgment stays visible
pub const DEFAULT_COPY_ACK: Duration = Duration::from_secs(2);

/// What the surface should currently show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Phrase not requested
    #[default]
    Hidden,
    /// Fetch in progress
    Loading,
    /// Phrase fetched and on screen
    Revealed(Secret),
    /// Fetch failed with a user-facing message
    Failed(String),
}

impl RevealState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RevealState::Loading)
    }

    /// The revealed phrase, if any
    pub fn secret(&self) -> Option<&Secret> {
        match self {
            RevealState::Revealed(secret) => Some(secret),
            _ => None,
        }
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            RevealState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Observable snapshot published to the surface
#[derive(Debug, Clone, Default)]
pub struct RevealView {
    state: RevealState,
    copied: bool,
    reveal_id: u64,
    copy_id: u64,
}

impl RevealView {
    /// Current reveal state
    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// Whether a copy acknowledgment is showing
    pub fn is_copied(&self) -> bool {
        self.copied
    }
}

/// Mediates between a UI surface and a [`WalletManager`]
///
/// Must be used from within a Tokio runtime: fetches and acknowledgment
/// timers run as spawned tasks.
pub struct SecretRevealController {
    wallet: Arc<dyn WalletManager>,
    clipboard: Arc<dyn ClipboardSink>,
    view: Arc<watch::Sender<RevealView>>,
    copy_ack: Duration,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
    ack_task: Mutex<Option<JoinHandle<()>>>,
}

impl SecretRevealController {
    /// Create a controller with the default 2 second copy acknowledgment
    pub fn new(wallet: Arc<dyn WalletManager>, clipboard: Arc<dyn ClipboardSink>) -> Self {
        Self::with_copy_ack(wallet, clipboard, DEFAULT_COPY_ACK)
    }

    /// Create a controller with a custom acknowledgment duration
    pub fn with_copy_ack(
        wallet: Arc<dyn WalletManager>,
        clipboard: Arc<dyn ClipboardSink>,
        copy_ack: Duration,
    ) -> Self {
        let (view, _) = watch::channel(RevealView::default());
        Self {
            wallet,
            clipboard,
            view: Arc::new(view),
            copy_ack,
            fetch_task: Mutex::new(None),
            ack_task: Mutex::new(None),
        }
    }

    /// Subscribe to view changes
    pub fn subscribe(&self) -> watch::Receiver<RevealView> {
        self.view.subscribe()
    }

    /// Borrow the current view
    ///
    /// Holds a read lock on the channel; drop the guard before calling any
    /// other controller method.
    pub fn view(&self) -> watch::Ref<'_, RevealView> {
        self.view.borrow()
    }

    /// Start fetching the phrase
    ///
    /// Only acts from `Hidden` or `Failed`. Returns `false` when ignored,
    /// which is the case while a fetch is outstanding or the phrase is
    /// already on screen.
    pub fn reveal(&self) -> bool {
        let mut request = None;
        self.view.send_if_modified(|view| match view.state {
            RevealState::Hidden | RevealState::Failed(_) => {
                view.reveal_id += 1;
                view.state = RevealState::Loading;
                request = Some(view.reveal_id);
                true
            }
            RevealState::Loading | RevealState::Revealed(_) => false,
        });

        let Some(request_id) = request else {
            debug!("Reveal ignored in current state");
            return false;
        };

        debug!(request_id, "Fetching recovery phrase");
        let wallet = Arc::clone(&self.wallet);
        let view = Arc::clone(&self.view);
        let handle = tokio::spawn(async move {
            let outcome = wallet.get_mnemonic().await;
            complete_fetch(&view, request_id, outcome);
        });

        // A previous fetch can only still be running if it was invalidated by
        // reset(); it is left to finish and its result is discarded by id.
        *lock(&self.fetch_task) = Some(handle);
        true
    }

    /// Copy the revealed phrase to the clipboard
    ///
    /// Sets the acknowledgment flag and (re)starts its expiry timer. Clipboard
    /// failures are logged and otherwise ignored.
    pub fn copy_to_clipboard(&self) -> Result<(), RevealError> {
        // Serialises copies so timer handles are replaced in id order.
        let mut ack_task = lock(&self.ack_task);

        let mut copied = None;
        self.view.send_if_modified(|view| match &view.state {
            RevealState::Revealed(secret) => {
                view.copy_id += 1;
                view.copied = true;
                copied = Some((view.copy_id, secret.phrase()));
                true
            }
            _ => false,
        });
        let Some((copy_id, phrase)) = copied else {
            return Err(RevealError::NotRevealed);
        };

        if let Err(e) = self.clipboard.write_text(&phrase) {
            warn!("Clipboard write failed: {}", e);
        }
        drop(phrase);

        let view = Arc::clone(&self.view);
        // Measured from the copy, not from when the timer task first runs.
        let deadline = tokio::time::Instant::now() + self.copy_ack;
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            view.send_if_modified(|current| {
                if current.copy_id == copy_id && current.copied {
                    current.copied = false;
                    true
                } else {
                    false
                }
            });
        });

        if let Some(previous) = ack_task.replace(timer) {
            previous.abort();
        }
        debug!(copy_id, "Recovery phrase copied");
        Ok(())
    }

    /// Hide the phrase and discard it from memory
    ///
    /// Also clears the copy acknowledgment and invalidates any fetch still in
    /// flight.
    pub fn reset(&self) {
        let mut ack_task = lock(&self.ack_task);
        if let Some(timer) = ack_task.take() {
            timer.abort();
        }

        self.view.send_if_modified(|view| {
            let changed = view.state != RevealState::Hidden || view.copied;
            view.reveal_id += 1;
            view.copy_id += 1;
            view.state = RevealState::Hidden;
            view.copied = false;
            changed
        });
        debug!("Reveal state reset");
    }
}

impl Drop for SecretRevealController {
    fn drop(&mut self) {
        if let Some(fetch) = lock(&self.fetch_task).take() {
            fetch.abort();
        }
        if let Some(timer) = lock(&self.ack_task).take() {
            timer.abort();
        }
    }
}

/// Apply a fetch outcome if it still belongs to the current request
fn complete_fetch(
    view: &watch::Sender<RevealView>,
    request_id: u64,
    outcome: Result<Secret, AccessError>,
) {
    let summary = match &outcome {
        Ok(secret) => Ok(secret.len()),
        Err(e) => Err(e.message().to_string()),
    };

    let applied = view.send_if_modified(move |current| {
        if current.reveal_id != request_id || !current.state.is_loading() {
            return false;
        }
        current.state = match outcome {
            Ok(secret) if secret.is_empty() => {
                RevealState::Failed("wallet returned an empty recovery phrase".to_string())
            }
            Ok(secret) => RevealState::Revealed(secret),
            Err(e) => RevealState::Failed(e.message().to_string()),
        };
        true
    });

    match (applied, summary) {
        (false, _) => debug!(request_id, "Discarding stale recovery phrase fetch"),
        (true, Ok(word_count)) => info!(request_id, word_count, "Recovery phrase revealed"),
        (true, Err(message)) => warn!(request_id, "Recovery phrase fetch failed: {}", message),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
