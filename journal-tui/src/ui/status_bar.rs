//! Bottom status bar — panel hints, logged-in user, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " 1:Add 2:Analytics 3:Trades 4:Help",
        theme::muted(),
    )];

    spans.push(Span::raw(" | "));
    match &app.session {
        Some(s) => spans.push(Span::styled(s.user.display_name(), theme::accent())),
        None => spans.push(Span::styled("logged out", theme::warning())),
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
