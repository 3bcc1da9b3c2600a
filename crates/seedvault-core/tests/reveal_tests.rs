//! Integration tests for the recovery phrase reveal lifecycle

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use seedvault_core::{
    AccessError, ClipboardError, ClipboardSink, RevealError, RevealState, Secret,
    SecretRevealController, WalletManager,
};

type FetchResult = Result<Secret, AccessError>;

/// Wallet whose fetches complete only when the test says so
#[derive(Default)]
struct ScriptedWallet {
    pending: Mutex<VecDeque<oneshot::Receiver<FetchResult>>>,
    calls: AtomicUsize,
}

impl ScriptedWallet {
    /// Queue the next fetch and return the handle that completes it
    fn next_fetch(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletManager for ScriptedWallet {
    async fn get_mnemonic(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected fetch");
        rx.await
            .unwrap_or_else(|_| Err(AccessError::new("fetch abandoned")))
    }
}

#[derive(Default)]
struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Harness {
    wallet: Arc<ScriptedWallet>,
    clipboard: Arc<RecordingClipboard>,
    controller: SecretRevealController,
}

fn harness() -> Harness {
    let wallet = Arc::new(ScriptedWallet::default());
    let clipboard = Arc::new(RecordingClipboard::default());
    let controller = SecretRevealController::new(wallet.clone(), clipboard.clone());
    Harness {
        wallet,
        clipboard,
        controller,
    }
}

fn words(list: &[&str]) -> Secret {
    Secret::from_words(list.iter().copied())
}

/// Let every runnable task finish (time is paused, so the runtime only
/// advances the clock once it is idle)
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn reveal_with(h: &Harness, secret: Secret) {
    let fetch = h.wallet.next_fetch();
    assert!(h.controller.reveal());
    fetch.send(Ok(secret)).unwrap();
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn test_reveal_transitions_through_loading() {
    let h = harness();
    let fetch = h.wallet.next_fetch();

    assert!(h.controller.reveal());
    assert_eq!(h.controller.view().state(), &RevealState::Loading);

    fetch.send(Ok(words(&["alpha", "beta", "gamma"]))).unwrap();
    settle().await;

    let view = h.controller.view();
    let secret = view.state().secret().expect("phrase should be revealed");
    assert_eq!(secret.words(), &["alpha", "beta", "gamma"]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_then_retry_succeeds() {
    let h = harness();

    let first = h.wallet.next_fetch();
    h.controller.reveal();
    first.send(Err(AccessError::new("locked"))).unwrap();
    settle().await;

    assert_eq!(
        h.controller.view().state(),
        &RevealState::Failed("locked".to_string())
    );

    // Not retried automatically
    assert_eq!(h.wallet.calls(), 1);

    let second = h.wallet.next_fetch();
    assert!(h.controller.reveal());
    assert!(h.controller.view().state().is_loading());

    second.send(Ok(words(&["alpha", "beta"]))).unwrap();
    settle().await;

    assert_eq!(
        h.controller.view().state().secret().map(Secret::len),
        Some(2)
    );
    assert_eq!(h.wallet.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reveal_ignored_while_loading() {
    let h = harness();
    let fetch = h.wallet.next_fetch();

    assert!(h.controller.reveal());
    assert!(!h.controller.reveal());
    settle().await;
    assert_eq!(h.wallet.calls(), 1);

    fetch.send(Ok(words(&["alpha"]))).unwrap();
    settle().await;
    assert!(h.controller.view().state().secret().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_stale_fetch_after_reset_is_discarded() {
    let h = harness();
    let fetch = h.wallet.next_fetch();

    h.controller.reveal();
    h.controller.reset();
    assert_eq!(h.controller.view().state(), &RevealState::Hidden);

    fetch.send(Ok(words(&["alpha", "beta", "gamma"]))).unwrap();
    settle().await;

    assert_eq!(h.controller.view().state(), &RevealState::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_after_reset_is_discarded() {
    let h = harness();
    let fetch = h.wallet.next_fetch();

    h.controller.reveal();
    h.controller.reset();

    fetch.send(Err(AccessError::new("locked"))).unwrap();
    settle().await;

    assert_eq!(h.controller.view().state(), &RevealState::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_stale_fetch_does_not_overwrite_newer_reveal() {
    let h = harness();
    let first = h.wallet.next_fetch();
    let second = h.wallet.next_fetch();

    h.controller.reveal();
    settle().await;
    h.controller.reset();
    assert!(h.controller.reveal());

    first.send(Ok(words(&["stale"]))).unwrap();
    settle().await;
    assert!(h.controller.view().state().is_loading());

    second.send(Ok(words(&["fresh", "words"]))).unwrap();
    settle().await;

    let view = h.controller.view();
    assert_eq!(
        view.state().secret().map(|s| s.words().to_vec()),
        Some(vec!["fresh".to_string(), "words".to_string()])
    );
}

#[tokio::test(start_paused = true)]
async fn test_copy_writes_space_joined_phrase() {
    let h = harness();
    reveal_with(&h, words(&["alpha", "beta", "gamma"])).await;

    h.controller.copy_to_clipboard().unwrap();

    assert!(h.controller.view().is_copied());
    assert_eq!(
        *h.clipboard.writes.lock().unwrap(),
        vec!["alpha beta gamma".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_copy_acknowledgment_expires_after_two_seconds() {
    let h = harness();
    reveal_with(&h, words(&["alpha"])).await;

    h.controller.copy_to_clipboard().unwrap();

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert!(h.controller.view().is_copied());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.controller.view().is_copied());

    // The phrase stays on screen
    assert!(h.controller.view().state().secret().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_acknowledgment_deadline_starts_at_copy() {
    let h = harness();
    reveal_with(&h, words(&["alpha"])).await;

    h.controller.copy_to_clipboard().unwrap();

    // Clock moves before the timer task gets its first poll
    tokio::time::advance(Duration::from_millis(800)).await;
    assert!(h.controller.view().is_copied());

    tokio::time::sleep(Duration::from_millis(1199)).await;
    assert!(h.controller.view().is_copied());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.controller.view().is_copied());
}

#[tokio::test(start_paused = true)]
async fn test_second_copy_restarts_acknowledgment() {
    let h = harness();
    reveal_with(&h, words(&["alpha", "beta", "gamma"])).await;

    h.controller.copy_to_clipboard().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(h.controller.view().is_copied());

    h.controller.copy_to_clipboard().unwrap();

    // Past the first copy's expiry
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(h.controller.view().is_copied());

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(h.controller.view().is_copied());

    // Two seconds after the second copy
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.controller.view().is_copied());

    assert_eq!(h.clipboard.writes.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_copy_rejected_unless_revealed() {
    let h = harness();
    assert_eq!(h.controller.copy_to_clipboard(), Err(RevealError::NotRevealed));

    let fetch = h.wallet.next_fetch();
    h.controller.reveal();
    assert_eq!(h.controller.copy_to_clipboard(), Err(RevealError::NotRevealed));

    fetch.send(Err(AccessError::new("locked"))).unwrap();
    settle().await;
    assert_eq!(h.controller.copy_to_clipboard(), Err(RevealError::NotRevealed));

    assert!(h.clipboard.writes.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_phrase_and_allows_reveal_again() {
    let h = harness();
    reveal_with(&h, words(&["alpha"])).await;
    h.controller.copy_to_clipboard().unwrap();

    h.controller.reset();
    {
        let view = h.controller.view();
        assert_eq!(view.state(), &RevealState::Hidden);
        assert!(!view.is_copied());
    }

    // Expired timer of the discarded copy must not interfere later
    tokio::time::sleep(Duration::from_secs(3)).await;

    reveal_with(&h, words(&["beta"])).await;
    h.controller.copy_to_clipboard().unwrap();
    assert!(h.controller.view().is_copied());
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_each_transition() {
    let h = harness();
    let mut rx = h.controller.subscribe();
    let fetch = h.wallet.next_fetch();

    h.controller.reveal();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().state().is_loading());

    fetch.send(Err(AccessError::new("locked"))).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().state().error(), Some("locked"));

    h.controller.reset();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().state(), &RevealState::Hidden);

    // Reset of an already hidden view is not a change
    h.controller.reset();
    assert!(!rx.has_changed().unwrap());
}
