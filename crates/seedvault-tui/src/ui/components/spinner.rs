//! Spinner for indeterminate waits

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner animation driven by the app tick counter
pub struct Spinner {
    /// Current frame
    frame: usize,
    /// Label text
    label: String,
}

impl Spinner {
    /// Create a new spinner
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            frame: 0,
            label: label.into(),
        }
    }

    /// Set frame based on tick counter
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.frame = (tick as usize / 2) % FRAMES.len();
        self
    }

    /// Spinner glyph followed by the label
    pub fn text(&self) -> String {
        format!("{} {}", FRAMES[self.frame], self.label)
    }

    /// Render the spinner
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let paragraph = Paragraph::new(self.text())
            .style(theme.text_highlight())
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_advances_every_other_tick() {
        assert_eq!(Spinner::new("Loading").with_tick(0).text(), "⠋ Loading");
        assert_eq!(Spinner::new("Loading").with_tick(1).text(), "⠋ Loading");
        assert_eq!(Spinner::new("Loading").with_tick(2).text(), "⠙ Loading");
        assert_eq!(Spinner::new("Loading").with_tick(20).text(), "⠋ Loading");
    }
}
