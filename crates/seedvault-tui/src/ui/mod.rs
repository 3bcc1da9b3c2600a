//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::{App, Screen};
use components::{header, status_bar};
use layout::ScreenLayout;

/// Main render function - delegates to appropriate screen
pub fn render(frame: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());
    let theme = &app.theme;

    let (title, hints) = match app.state.current_screen {
        Screen::Unlock => {
            screens::unlock::draw(frame, layout.content, app);
            ("Unlock", screens::unlock::hints(app))
        }
        Screen::RecoveryPhrase => {
            screens::recovery_phrase::draw(frame, layout.content, app);
            ("Recovery Phrase", screens::recovery_phrase::hints(app))
        }
    };

    header::render(frame, layout.header, title, theme);

    let idle_warning = (app.state.current_screen == Screen::RecoveryPhrase
        && app.state.idle.is_warning_period())
    .then(|| format!("Locking in {}", app.state.idle.remaining_formatted()));

    // The unlock dialog shows its own errors.
    let error = match app.state.current_screen {
        Screen::Unlock => None,
        Screen::RecoveryPhrase => app.state.error_message.as_deref(),
    };

    status_bar::render_status_bar(
        frame,
        layout.status,
        app.state.status_message.as_deref(),
        error,
        idle_warning.as_deref(),
        theme,
    );
    status_bar::render_help_footer(frame, layout.footer, &hints, theme);
}
