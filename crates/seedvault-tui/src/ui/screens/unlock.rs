//! PIN entry screen for unlocking the keystore

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use seedvault_core::keystore::{MAX_PIN_LENGTH, MIN_PIN_LENGTH};

use crate::app::App;
use crate::ui::layout::centered_rect;
use crate::utils::truncate_start;

/// Draw the PIN entry screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    // Center the PIN entry dialog
    let dialog = centered_rect(60, 60, area);

    // Dialog box
    let block = Block::default()
        .title(" Unlock Keystore ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    // Layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Instructions
            Constraint::Length(2), // Keystore path
            Constraint::Length(2), // PIN display
            Constraint::Length(2), // Error message
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let instructions = Paragraph::new("Enter your PIN to unlock")
        .style(theme.text_secondary())
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[0]);

    let path = app.state.keystore_path.display().to_string();
    let path_widget = Paragraph::new(truncate_start(&path, inner.width.saturating_sub(2) as usize))
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(path_widget, chunks[1]);

    // PIN display (masked)
    let pin_len = app.state.pin_input.len();

    let mut pin_display = String::from("[ ");
    for i in 0..MAX_PIN_LENGTH {
        pin_display.push(if i < pin_len { '●' } else { '○' });
        if i < MAX_PIN_LENGTH - 1 {
            pin_display.push(' ');
        }
    }
    pin_display.push_str(" ]");

    let pin_style = if pin_len >= MIN_PIN_LENGTH {
        theme.text_highlight()
    } else {
        theme.text()
    };

    let pin_widget = Paragraph::new(pin_display)
        .style(pin_style)
        .alignment(Alignment::Center);
    frame.render_widget(pin_widget, chunks[2]);

    if let Some(error) = &app.state.error_message {
        let error_widget = Paragraph::new(error.as_str())
            .style(theme.danger())
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, chunks[3]);
    }
}

/// Key hints for the PIN entry screen
pub fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.state.unlocking {
        vec![]
    } else if app.state.pin_input.len() >= MIN_PIN_LENGTH {
        vec![("Enter", "Unlock"), ("Esc", "Quit")]
    } else {
        vec![("0-9", "PIN"), ("Esc", "Quit")]
    }
}
