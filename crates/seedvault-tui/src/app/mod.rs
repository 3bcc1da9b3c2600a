//! Application state and event handling

pub mod config;
mod events;
mod state;

pub use config::{AppConfig, ClipboardMode, ConfigError};
pub use events::{Event, EventHandler};
pub use state::{AppState, Screen};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use seedvault_core::keystore::{MAX_PIN_LENGTH, MIN_PIN_LENGTH};
use seedvault_core::{
    ClipboardSink, KeystoreError, KeystoreWallet, RevealError, SecretRevealController,
};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::ui::{self, Theme};

/// Application result type
pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Redraw and idle-check interval
const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Color palette
    pub theme: Theme,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    /// Keystore the phrase is read from
    wallet: Arc<KeystoreWallet>,

    /// Reveal lifecycle for the phrase screen
    controller: SecretRevealController,

    /// Input, tick and background event queue
    events: EventHandler,
}

impl App {
    /// Create a new application instance
    pub fn new(
        config: &AppConfig,
        wallet: Arc<KeystoreWallet>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        let controller =
            SecretRevealController::with_copy_ack(wallet.clone(), clipboard, config.copy_ack());
        let mut state = AppState::new(
            wallet.path().to_path_buf(),
            controller.subscribe(),
            config.idle_lock(),
        );
        state.clipboard_enabled = config.clipboard != ClipboardMode::Disabled;

        Self {
            state,
            theme: Theme::default(),
            should_quit: false,
            tick: 0,
            wallet,
            controller,
            events: EventHandler::new(),
        }
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        self.events.start(TICK_RATE);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &*self))?;

            tokio::select! {
                event = self.events.next() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                changed = self.state.reveal.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Reveal controller driving the phrase screen
    pub fn controller(&self) -> &SecretRevealController {
        &self.controller
    }

    /// Handle a queued event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {
                self.tick = self.tick.wrapping_add(1);
                if self.state.current_screen == Screen::RecoveryPhrase
                    && self.state.idle.is_expired()
                {
                    info!("Idle timeout reached");
                    self.lock("Locked after inactivity");
                }
            }
            Event::Resize => {}
            Event::Unlocked(result) => self.finish_unlock(result),
        }
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        self.state.idle.touch();

        match self.state.current_screen {
            Screen::Unlock => self.handle_unlock_key(key.code),
            Screen::RecoveryPhrase => self.handle_phrase_key(key.code),
        }
    }

    fn handle_unlock_key(&mut self, key: KeyCode) {
        if self.state.unlocking {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.state.pin_input.len() < MAX_PIN_LENGTH {
                    self.state.pin_input.push(c);
                    self.state.error_message = None;
                }
            }
            KeyCode::Backspace => {
                self.state.pin_input.pop();
            }
            KeyCode::Enter => self.start_unlock(),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_phrase_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('r') => {
                self.state.clear_messages();
                self.controller.reveal();
            }
            KeyCode::Char('c') if !self.state.clipboard_enabled => {
                self.state.error_message = None;
                self.state.status_message = Some("Clipboard disabled".to_string());
            }
            KeyCode::Char('c') => match self.controller.copy_to_clipboard() {
                Ok(()) => self.state.error_message = None,
                Err(RevealError::NotRevealed) => {
                    self.state.error_message = Some("Reveal the phrase before copying".to_string());
                }
            },
            KeyCode::Esc | KeyCode::Char('h') => {
                self.state.clear_messages();
                self.controller.reset();
            }
            KeyCode::Char('l') => self.lock("Locked"),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Check the typed PIN on a blocking thread
    fn start_unlock(&mut self) {
        if let Some(seconds) = self.state.attempts.lockout_remaining() {
            self.state.error_message =
                Some(format!("Too many attempts. Try again in {}s", seconds));
            return;
        }

        if self.state.pin_input.len() < MIN_PIN_LENGTH {
            self.state.error_message = Some(format!(
                "PIN must be {}-{} digits",
                MIN_PIN_LENGTH, MAX_PIN_LENGTH
            ));
            return;
        }

        let pin = std::mem::replace(&mut self.state.pin_input, Zeroizing::new(String::new()));
        let wallet = Arc::clone(&self.wallet);
        let sender = self.events.sender();

        self.state.unlocking = true;
        self.state.clear_messages();
        self.state.status_message = Some("Unlocking...".to_string());

        tokio::task::spawn_blocking(move || {
            let result = wallet.unlock(&pin).and_then(|()| wallet.word_count());
            // Receiver is gone only when the app is shutting down.
            let _ = sender.send(Event::Unlocked(result));
        });
    }

    fn finish_unlock(&mut self, result: Result<usize, KeystoreError>) {
        self.state.unlocking = false;
        self.state.status_message = None;

        match result {
            Ok(word_count) => {
                self.state.attempts.record_success();
                self.state.word_count = Some(word_count);
                self.state.error_message = None;
                self.state.idle.touch();
                self.state.current_screen = Screen::RecoveryPhrase;
                info!(word_count, "Keystore unlocked");
            }
            Err(KeystoreError::WrongPin) => {
                self.state.attempts.record_failure();
                warn!(failed = self.state.attempts.failed(), "Incorrect PIN");
                self.state.error_message = Some(match self.state.attempts.lockout_remaining() {
                    Some(seconds) => format!("Too many attempts. Locked for {}s", seconds),
                    None => format!(
                        "Incorrect PIN ({} attempts remaining)",
                        self.state.attempts.attempts_remaining()
                    ),
                });
            }
            Err(e) => {
                warn!("Unlock failed: {}", e);
                self.state.error_message = Some(e.to_string());
            }
        }
    }

    /// Hide the phrase, forget the key and return to PIN entry
    pub fn lock(&mut self, reason: &str) {
        self.controller.reset();
        self.wallet.lock();
        self.state.pin_input.clear();
        self.state.error_message = None;
        self.state.status_message = Some(reason.to_string());
        self.state.current_screen = Screen::Unlock;
        debug!(reason, "Returned to unlock screen");
    }

    /// Drop any revealed phrase and the key before exit
    pub fn shutdown(&mut self) {
        self.controller.reset();
        self.wallet.lock();
        info!("Session closed");
    }
}
