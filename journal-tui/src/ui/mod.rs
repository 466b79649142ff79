//! Top-level UI layout — one panel at a time with a status bar.

pub mod analytics_panel;
pub mod entry_panel;
pub mod help_panel;
pub mod overlays;
pub mod status_bar;
pub mod trades_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::Login => overlays::render_login(f, main_area, app),
        Overlay::SymbolPicker => overlays::render_symbol_picker(f, main_area, app),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;
    let is_active = app.overlay == Overlay::None;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(is_active))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(is_active));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Entry => entry_panel::render(f, inner, app),
        Panel::Analytics => analytics_panel::render(f, inner, app),
        Panel::Trades => trades_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::tests::{harness, session, trade};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Render one frame and return it as plain text, one line per row.
    pub(crate) fn render_text(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn every_panel_renders() {
        let mut h = harness();
        for i in 0..Panel::COUNT {
            h.app.active_panel = Panel::from_index(i).unwrap();
            let text = render_text(&h.app, 100, 40);
            assert!(text.contains(h.app.active_panel.label()));
        }
    }

    #[test]
    fn overlays_render_on_tiny_terminal() {
        let mut h = harness();
        for overlay in [
            Overlay::Welcome,
            Overlay::Login,
            Overlay::SymbolPicker,
            Overlay::ErrorHistory,
        ] {
            h.app.overlay = overlay;
            render_text(&h.app, 20, 6);
        }
    }

    #[test]
    fn analytics_states() {
        let mut h = harness();
        h.app.active_panel = Panel::Analytics;
        assert!(render_text(&h.app, 100, 40).contains("Log in"));

        h.app.adopt_session(session("USR001"));
        assert!(render_text(&h.app, 100, 40).contains("Loading..."));

        h.app.on_trades_loaded("USR001", Ok(Vec::new()));
        assert!(render_text(&h.app, 100, 40).contains("No trades available for analytics yet."));

        h.app.on_trades_loaded(
            "USR001",
            Ok(vec![
                trade("EUR/USD", 10.0, 1),
                trade("EUR/USD", -5.0, 2),
                trade("GBP/USD", 3.0, 3),
            ]),
        );
        let text = render_text(&h.app, 120, 45);
        assert!(text.contains("$8.00"));
        assert!(text.contains("66.7%"));
        assert!(text.contains("+$10.00"));
        assert!(text.contains("$-5.00"));
        assert!(text.contains("GBP/USD"));
    }
}
