//! Recovery phrase screen
//!
//! Mirrors the reveal controller: a prompt while hidden, a spinner while
//! loading, the numbered words once revealed and the error with a retry hint
//! on failure.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use seedvault_core::{RevealState, RevealView};

use crate::app::App;
use crate::ui::components::spinner::Spinner;
use crate::ui::Theme;
use crate::utils::{grid_columns, word_grid};

/// Draw the recovery phrase screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let view = app.state.reveal.borrow();

    let block = Block::default()
        .title(" Recovery Phrase ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(if view.state().secret().is_some() {
            theme.border_focused()
        } else {
            theme.border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Warning
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Copy acknowledgment
        ])
        .split(inner);

    let warning = Paragraph::new(
        "Anyone who sees these words can take your funds. \
         Make sure nobody is watching your screen.",
    )
    .style(theme.warning())
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(warning, chunks[0]);

    match view.state() {
        RevealState::Hidden => {
            let count = app
                .state
                .word_count
                .map(|n| format!("{}-word phrase hidden", n))
                .unwrap_or_else(|| "Phrase hidden".to_string());
            let lines = vec![
                Line::styled(count, theme.text_secondary()),
                Line::raw(""),
                Line::styled("[Enter] Reveal", theme.text_highlight()),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
        }
        RevealState::Loading => {
            Spinner::new("Retrieving recovery phrase...")
                .with_tick(app.tick)
                .render(frame, chunks[1], theme);
        }
        RevealState::Revealed(secret) => {
            let grid = word_grid(secret.words(), grid_columns(secret.len()));
            let lines: Vec<Line> = grid
                .iter()
                .map(|row| Line::styled(row.as_str(), theme.word()))
                .collect();
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
        }
        RevealState::Failed(message) => {
            let lines = vec![
                Line::styled(format!("Error: {}", message), theme.danger()),
                Line::raw(""),
                Line::styled("[Enter] Retry", theme.text_highlight()),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                chunks[1],
            );
        }
    }

    render_copy_ack(frame, chunks[2], &view, theme);
}

fn render_copy_ack(frame: &mut Frame, area: Rect, view: &RevealView, theme: &Theme) {
    if !view.is_copied() {
        return;
    }

    let ack = Paragraph::new("✓ Copied to clipboard")
        .style(theme.success())
        .alignment(Alignment::Center);
    frame.render_widget(ack, area);
}

/// Key hints for the recovery phrase screen
pub fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.state.reveal.borrow().state() {
        RevealState::Hidden => vec![("Enter", "Reveal"), ("l", "Lock"), ("q", "Quit")],
        RevealState::Loading => vec![("Esc", "Cancel"), ("q", "Quit")],
        RevealState::Revealed(_) if app.state.clipboard_enabled => vec![
            ("c", "Copy"),
            ("Esc", "Hide"),
            ("l", "Lock"),
            ("q", "Quit"),
        ],
        RevealState::Revealed(_) => vec![("Esc", "Hide"), ("l", "Lock"), ("q", "Quit")],
        RevealState::Failed(_) => vec![("Enter", "Retry"), ("l", "Lock"), ("q", "Quit")],
    }
}
