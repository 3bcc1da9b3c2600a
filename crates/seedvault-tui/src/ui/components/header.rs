//! Header component

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

/// Render the header bar
pub fn render(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let now = chrono::Local::now();
    let time_str = now.format("%H:%M:%S").to_string();

    let header_text = Line::from(vec![
        Span::styled(
            " SEEDVAULT ",
            Style::default()
                .fg(Color::Black)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(title, theme.text().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(area.width.saturating_sub(title.len() as u16 + 23) as usize)),
        Span::styled(format!(" {} ", time_str), theme.text_highlight()),
    ]);

    let header = Paragraph::new(header_text).style(theme.header());

    frame.render_widget(header, area);
}
