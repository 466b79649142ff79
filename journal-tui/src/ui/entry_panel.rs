//! Panel 1 — Add Trade: the entry form.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use journal_core::domain::symbol_label;
use journal_core::form::Field;

use crate::app::{AppState, EntryRow};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let entry = &app.entry;
    let form = &entry.form;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(match &app.session {
        Some(s) => Line::from(vec![
            Span::styled("Recording as ", theme::muted()),
            Span::styled(s.user.display_name(), theme::accent()),
        ]),
        None => Line::from(Span::styled(
            "Not logged in. Press L to log in before saving.",
            theme::warning(),
        )),
    });
    lines.push(Line::from(Span::styled(
        "[j/k]move [Enter]edit/pick [h/l]cycle [Del]clear [Ctrl+S]save",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    let rows = entry.rows();
    let visible = area.height.saturating_sub(lines.len() as u16) as usize;
    let start = entry.cursor.saturating_sub(visible.saturating_sub(1));

    for (i, row) in rows.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == entry.cursor;
        let editing = is_cursor && entry.editing;

        if *row == EntryRow::Save {
            let label = if form.is_loading() { "[ Saving... ]" } else { "[ Save Trade ]" };
            let style = if is_cursor { theme::selected() } else { theme::accent_bold() };
            lines.push(Line::from(vec![
                Span::raw(format!("{:>20}  ", "")),
                Span::styled(label, style),
            ]));
            continue;
        }

        let (label, raw, placeholder) = match row {
            EntryRow::Field(field) => (field.label(), form.get(*field), field.placeholder()),
            EntryRow::CustomMistake => ("Custom Mistake", form.custom_mistake(), "Describe the mistake"),
            EntryRow::Save => continue,
        };

        let shown = match row {
            EntryRow::Field(Field::Symbol) => symbol_label(raw).unwrap_or(raw).to_string(),
            EntryRow::Field(Field::Mistake) => form.selected_mistake().to_string(),
            _ => raw.to_string(),
        };

        let label_style = if is_cursor { theme::accent_bold() } else { theme::muted() };
        let mut spans = vec![Span::styled(format!("{label:>20}: "), label_style)];

        if shown.is_empty() && !editing {
            spans.push(Span::styled(placeholder.to_string(), theme::neutral()));
        } else {
            let style = if is_cursor { theme::selected() } else { theme::text() };
            spans.push(Span::styled(shown, style));
        }
        if editing {
            spans.push(Span::styled("_", theme::accent()));
        } else if is_cursor && !row.is_text() {
            spans.push(Span::styled("  ◂ ▸", theme::muted()));
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use crate::app::tests::harness;
    use crate::app::EntryRow;
    use crate::ui::tests::render_text;
    use journal_core::form::Field;

    #[test]
    fn shows_placeholders_and_symbol_label() {
        let mut h = harness();
        let text = render_text(&h.app, 100, 30);
        assert!(text.contains("Volume (Lots)"));
        assert!(text.contains("Why did you take this trade?"));
        assert!(text.contains("Not logged in"));

        h.app.entry.form.set(Field::Symbol, "XAU/USD");
        assert!(render_text(&h.app, 100, 30).contains("Gold / USD"));
    }

    #[test]
    fn cursor_scrolls_into_view() {
        let mut h = harness();
        h.app.entry.cursor = h.app.entry.rows().len() - 1;
        assert_eq!(h.app.entry.current_row(), EntryRow::Save);
        assert!(render_text(&h.app, 80, 10).contains("Save Trade"));
    }
}
