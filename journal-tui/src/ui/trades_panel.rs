//! Panel 3 — Trades: the fetched trade list as a table.

use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use journal_core::analytics::format_usd;
use journal_core::Trade;

use crate::app::AppState;
use crate::theme;

const HEADERS: [&str; 9] = [
    "#", "Closed", "Symbol", "Type", "Volume", "Open", "Close", "Net P/L", "Mistake",
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let state = &app.trades;

    if app.session.is_none() {
        let msg = Span::styled("Log in (press L) to see your trades.", theme::muted());
        f.render_widget(Paragraph::new(msg), area);
        return;
    }
    if state.loading {
        f.render_widget(Paragraph::new(Span::styled("Loading...", theme::muted())), area);
        return;
    }
    if state.trades.is_empty() {
        let msg = Span::styled("No trades recorded yet. Add one in panel 1.", theme::muted());
        f.render_widget(Paragraph::new(msg), area);
        return;
    }

    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme::accent().add_modifier(Modifier::BOLD))),
    )
    .height(1);

    // Keep the cursor on screen: header takes one row.
    let visible = area.height.saturating_sub(1) as usize;
    let start = state.cursor.saturating_sub(visible.saturating_sub(1));

    let rows = state
        .trades
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, t)| {
            let style = if i == state.cursor { theme::selected() } else { theme::text() };
            Row::new(cells(i, t)).style(style).height(1)
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    f.render_widget(table, area);
}

fn cells(index: usize, t: &Trade) -> Vec<Cell<'static>> {
    let number = t
        .trade_no
        .or(t.id)
        .map(|n| n.to_string())
        .unwrap_or_else(|| (index + 1).to_string());
    vec![
        Cell::from(number),
        Cell::from(closed_at(t.close_time)),
        Cell::from(t.symbol.clone()),
        Cell::from(t.trade_type.as_ref().map(|k| k.to_string()).unwrap_or_default()),
        Cell::from(format!("{}", t.volume)),
        Cell::from(format!("{}", t.price_open)),
        Cell::from(format!("{}", t.price_close)),
        Cell::from(format_usd(t.net_profit)).style(theme::pnl(t.net_profit)),
        Cell::from(t.mistake.clone().unwrap_or_default()),
    ]
}

fn closed_at(t: Option<DateTime<Utc>>) -> String {
    match t {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".into(),
    }
}
