//! Panel 4 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "L / O", "Log in / log out");
    key(&mut lines, "r", "Reload trades and analytics");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "Ctrl+S", "Save the trade in the entry form");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Add Trade");
    key(&mut lines, "j / k", "Move between fields");
    key(&mut lines, "Enter", "Edit field, open symbol picker, or save");
    key(&mut lines, "h / l", "Cycle type or mistake");
    key(&mut lines, "Del", "Clear the field under the cursor");
    key(&mut lines, "Esc", "Stop editing");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Analytics");
    key(&mut lines, "", "Summary cards, equity curve, win/loss, P/L by symbol");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Trades");
    key(&mut lines, "j / k", "Scroll");
    key(&mut lines, "g / G", "Jump to first / last");
    lines.push(Line::from(""));

    section(&mut lines, "Notes");
    key(&mut lines, "Numbers", "Unparseable numeric input is saved as 0");
    key(&mut lines, "Times", "YYYY-MM-DDTHH:MM local time; blank means now");
    key(&mut lines, "Win rate", "Break-even trades count as losses");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
