//! Panel 2 — Analytics: summary cards, equity curve, win/loss and per-symbol P/L.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
};
use ratatui::Frame;

use journal_core::analytics::format_usd;
use journal_core::{Analytics, EquityPoint, SymbolPerformance, WinLoss};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let state = &app.trades;
    if app.session.is_none() {
        return render_message(f, area, "Log in (press L) to see your analytics.");
    }
    if state.loading {
        return render_message(f, area, "Loading...");
    }
    if state.analytics.is_empty() {
        return render_message(f, area, "No trades available for analytics yet.");
    }
    render_dashboard(f, area, &state.analytics);
}

fn render_message(f: &mut Frame, area: Rect, msg: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_dashboard(f: &mut Frame, area: Rect, a: &Analytics) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(a.symbol_performance.len().clamp(3, 10) as u16 + 2),
        ])
        .split(area);

    render_cards(f, rows[0], a);
    render_equity(f, rows[1], &a.equity_curve);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[2]);
    render_win_loss(f, bottom[0], a.win_loss);
    render_symbols(f, bottom[1], &a.symbol_performance);
}

fn render_cards(f: &mut Frame, area: Rect, a: &Analytics) {
    let s = &a.summary;
    let cards = [
        ("Total P/L", s.total_pl_display(), theme::pnl(s.total_pl)),
        ("Win Rate", s.win_rate_display(), theme::accent()),
        ("Best Trade", s.best_trade_display(), theme::positive()),
        ("Worst Trade", s.worst_trade_display(), theme::negative()),
    ];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value, style), col) in cards.into_iter().zip(cols.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .title(format!(" {title} "))
            .title_style(theme::muted());
        let para = Paragraph::new(Span::styled(value, style.add_modifier(ratatui::style::Modifier::BOLD)))
            .block(block);
        f.render_widget(para, *col);
    }
}

fn render_equity(f: &mut Frame, area: Rect, curve: &[EquityPoint]) {
    let data: Vec<(f64, f64)> = curve
        .iter()
        .enumerate()
        .filter(|(_, p)| p.equity.is_finite())
        .map(|(i, p)| (i as f64, p.equity))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Equity Curve ")
        .title_style(theme::accent_bold());

    if data.is_empty() {
        let para = Paragraph::new(Span::styled("Equity is not a number.", theme::muted())).block(block);
        f.render_widget(para, area);
        return;
    }

    let min_y = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min).min(0.0);
    let max_y = data.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max).max(0.0);
    let padding = ((max_y - min_y).abs() * 0.05).max(1.0);
    let y_min = min_y - padding;
    let y_max = max_y + padding;
    let x_max = curve.len().saturating_sub(1) as f64;

    let first = curve.first().map(|p| p.date.as_str()).unwrap_or("");
    let last = curve.last().map(|p| p.date.as_str()).unwrap_or("");

    let dataset = Dataset::default()
        .name("Equity")
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first.to_string(), theme::muted()),
                    Span::styled(last.to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_win_loss(f: &mut Frame, area: Rect, split: WinLoss) {
    let bars = [
        Bar::default()
            .value(split.wins as u64)
            .text_value(split.wins.to_string())
            .label("Wins".into())
            .style(theme::positive()),
        Bar::default()
            .value(split.losses as u64)
            .text_value(split.losses.to_string())
            .label("Losses".into())
            .style(theme::negative()),
    ];

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(" Win / Loss ")
                .title_style(theme::accent_bold()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(3);

    f.render_widget(chart, area);
}

/// Signed horizontal bars; the bar chart widget cannot draw negatives.
fn render_symbols(f: &mut Frame, area: Rect, perf: &[SymbolPerformance]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" P/L by Symbol ")
        .title_style(theme::accent_bold());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let max_abs = perf
        .iter()
        .map(|p| p.profit.abs())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    let bar_room = inner.width.saturating_sub(34) as f64;

    let lines: Vec<Line> = perf
        .iter()
        .take(inner.height as usize)
        .map(|p| {
            let len = if max_abs > 0.0 && p.profit.is_finite() {
                ((p.profit.abs() / max_abs) * bar_room).round() as usize
            } else {
                0
            };
            Line::from(vec![
                Span::styled(format!("{:<10} ", truncate(&p.symbol, 10)), theme::text()),
                Span::styled(format!("{:>12} ", format_usd(p.profit)), theme::pnl(p.profit)),
                Span::styled(format!("{:>4}x ", p.trades), theme::muted()),
                Span::styled("█".repeat(len.max(1)), theme::pnl(p.profit)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}.")
    }
}
