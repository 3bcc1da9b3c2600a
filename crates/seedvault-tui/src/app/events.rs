//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use seedvault_core::KeystoreError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal tick (for animations and the idle timer)
    Tick,
    /// Terminal resized
    Resize,
    /// Background PIN check finished, carrying the keystore word count
    Unlocked(Result<usize, KeystoreError>),
}

/// Merges terminal input, ticks and background results into one queue
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
    /// Terminal reader task, once started
    input_task: Option<JoinHandle<()>>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Create an event queue without reading from the terminal
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            input_task: None,
        }
    }

    /// Start reading terminal events and emitting ticks
    pub fn start(&mut self, tick_rate: Duration) {
        if self.input_task.is_some() {
            return;
        }

        let sender = self.sender.clone();
        self.input_task = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                let event = tokio::select! {
                    _ = interval.tick() => Event::Tick,
                    maybe_event = reader.next() => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::warn!("Terminal input error: {}", e);
                            break;
                        }
                        None => break,
                    },
                };

                if sender.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_next(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        if let Some(task) = self.input_task.take() {
            task.abort();
        }
    }
}
