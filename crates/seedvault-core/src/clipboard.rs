//! Clipboard sinks
//!
//! The clipboard is write-only from Seedvault's point of view: text goes in
//! and is never read back.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

/// Clipboard write failure
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard is disabled")]
    Disabled,
}

/// Destination for copied text
pub trait ClipboardSink: Send + Sync {
    /// Replace the clipboard contents with `text`
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard writer using the OSC 52 terminal escape sequence
///
/// Works over SSH and inside multiplexers that forward OSC 52, without any
/// platform clipboard library.
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    /// Sink writing to the process's standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ClipboardSink for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let encoded = zeroize::Zeroizing::new(STANDARD.encode(text.as_bytes()));
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        write!(out, "\x1b]52;c;{}\x07", encoded.as_str())?;
        out.flush()?;
        Ok(())
    }
}

/// Sink used when clipboard export is turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClipboard;

impl ClipboardSink for NullClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        let sink = Osc52Clipboard::new(Vec::new());
        sink.write_text("alpha beta gamma").unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;YWxwaGEgYmV0YSBnYW1tYQ==\x07");
    }

    #[test]
    fn test_null_clipboard_reports_disabled() {
        let result = NullClipboard.write_text("anything");
        assert!(matches!(result, Err(ClipboardError::Disabled)));
    }
}
