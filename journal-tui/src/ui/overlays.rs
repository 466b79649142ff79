//! Overlay widgets — welcome, login, symbol picker, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, LoginField};
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Trade Journal ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Press L to log in", theme::muted())),
        Line::from(Span::styled(
            "  2. Fill in the form on panel 1 and press Ctrl+S",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Press 2 for analytics, 3 for your trade list",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Email/password prompt.
pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Log In [Tab]switch [Enter]submit [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let login = &app.login;
    let masked = "*".repeat(login.password.chars().count());
    let mut lines = vec![
        Line::from(""),
        input_line("Email", &login.email, login.focus == LoginField::Email),
        input_line("Password", &masked, login.focus == LoginField::Password),
        Line::from(""),
    ];
    if login.pending {
        lines.push(Line::from(Span::styled("Logging in...", theme::warning())));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn input_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let label_style = if focused { theme::accent_bold() } else { theme::muted() };
    let mut spans = vec![
        Span::styled(format!("{label:>9}: "), label_style),
        Span::styled(value.to_string(), theme::text()),
    ];
    if focused {
        spans.push(Span::styled("_", theme::accent()));
    }
    Line::from(spans)
}

/// Searchable symbol list for the entry form.
pub fn render_symbol_picker(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Select Symbol [Enter]choose [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let picker = &app.picker;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(picker.query.clone(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(""),
    ];

    let matches = picker.matches();
    if matches.is_empty() {
        lines.push(Line::from(Span::styled("No matching symbols.", theme::muted())));
    }

    let visible = inner.height.saturating_sub(2) as usize;
    let start = picker.cursor.saturating_sub(visible.saturating_sub(1));
    for (i, info) in matches.iter().enumerate().skip(start).take(visible) {
        let style = if i == picker.cursor { theme::selected() } else { theme::text() };
        lines.push(Line::from(Span::styled(format!(" {} ", info.label), style)));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
