//! Keyboard input dispatch — overlays → field editing → global keys → panel keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use journal_core::domain::{MISTAKES, TRADE_TYPES};
use journal_core::form::Field;

use crate::app::{AppState, EntryRow, LoginField, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.running = false;
                return;
            }
            KeyCode::Char('s') => {
                app.submit_trade();
                return;
            }
            _ => {}
        }
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Login => {
            handle_login_overlay(app, key);
            return;
        }
        Overlay::SymbolPicker => {
            handle_picker_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. A field being edited takes every printable key.
    if app.active_panel == Panel::Entry && app.entry.editing {
        handle_editing(app, key);
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('L') => {
            app.open_login();
            return;
        }
        KeyCode::Char('O') => {
            app.logout();
            return;
        }
        KeyCode::Char('r') => {
            if app.session.is_some() {
                app.request_trades();
                app.set_status("Reloading trades...");
            } else {
                app.set_warning("Log in (L) to load trades.");
            }
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Entry => handle_entry_key(app, key),
        Panel::Trades => handle_trades_key(app, key),
        Panel::Analytics | Panel::Help => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_login_overlay(app: &mut AppState, key: KeyEvent) {
    let login = &mut app.login;
    match key.code {
        KeyCode::Esc => {
            login.password.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.focus = match login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Enter => match login.focus {
            LoginField::Email => login.focus = LoginField::Password,
            LoginField::Password => app.submit_login(),
        },
        KeyCode::Backspace => {
            match login.focus {
                LoginField::Email => login.email.pop(),
                LoginField::Password => login.password.pop(),
            };
        }
        KeyCode::Char(c) => match login.focus {
            LoginField::Email => login.email.push(c),
            LoginField::Password => login.password.push(c),
        },
        _ => {}
    }
}

fn handle_picker_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.picker.query.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            if let Some(info) = app.picker.matches().get(app.picker.cursor) {
                app.entry.form.set(Field::Symbol, info.value);
            }
            app.picker.query.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Down => {
            if app.picker.cursor + 1 < app.picker.matches().len() {
                app.picker.cursor += 1;
            }
        }
        KeyCode::Up => {
            app.picker.cursor = app.picker.cursor.saturating_sub(1);
        }
        KeyCode::Backspace => {
            app.picker.query.pop();
            app.picker.cursor = 0;
        }
        KeyCode::Char(c) => {
            app.picker.query.push(c);
            app.picker.cursor = 0;
        }
        _ => {}
    }
}

fn handle_editing(app: &mut AppState, key: KeyEvent) {
    let row = app.entry.current_row();
    match key.code {
        KeyCode::Esc => app.entry.editing = false,
        KeyCode::Enter | KeyCode::Tab => {
            app.entry.editing = false;
            move_cursor(app, 1);
        }
        KeyCode::Backspace => edit_text(app, row, |s| {
            s.pop();
        }),
        KeyCode::Char(c) => edit_text(app, row, |s| s.push(c)),
        _ => {}
    }
}

fn edit_text(app: &mut AppState, row: EntryRow, edit: impl FnOnce(&mut String)) {
    if row == EntryRow::CustomMistake {
        let mut text = app.entry.form.custom_mistake().to_string();
        edit(&mut text);
        app.entry.form.set_custom_mistake(text);
    } else if let Some(s) = app.entry.text_mut(row) {
        edit(s);
    }
}

fn handle_entry_key(app: &mut AppState, key: KeyEvent) {
    let row = app.entry.current_row();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('h') | KeyCode::Left => cycle_choice(app, row, -1),
        KeyCode::Char('l') | KeyCode::Right => cycle_choice(app, row, 1),
        KeyCode::Delete => edit_text(app, row, String::clear),
        KeyCode::Enter => match row {
            EntryRow::Field(Field::Symbol) => {
                app.picker.query.clear();
                app.picker.cursor = 0;
                app.overlay = Overlay::SymbolPicker;
            }
            EntryRow::Field(Field::TradeType) | EntryRow::Field(Field::Mistake) => {
                cycle_choice(app, row, 1)
            }
            EntryRow::Save => app.submit_trade(),
            _ => app.entry.editing = true,
        },
        _ => {}
    }
}

fn move_cursor(app: &mut AppState, delta: isize) {
    let count = app.entry.rows().len();
    let next = app.entry.cursor as isize + delta;
    app.entry.cursor = next.clamp(0, count as isize - 1) as usize;
}

fn cycle_choice(app: &mut AppState, row: EntryRow, direction: isize) {
    let form = &mut app.entry.form;
    match row {
        EntryRow::Field(Field::TradeType) => {
            let current = TRADE_TYPES.iter().position(|t| *t == form.get(Field::TradeType));
            let next = step(current, TRADE_TYPES.len(), direction);
            form.set(Field::TradeType, TRADE_TYPES[next]);
        }
        EntryRow::Field(Field::Mistake) => {
            let current = MISTAKES.iter().position(|m| *m == form.selected_mistake());
            let next = step(current, MISTAKES.len(), direction);
            form.select_mistake(MISTAKES[next]);
            // The custom row may have disappeared below the cursor.
            move_cursor(app, 0);
        }
        _ => {}
    }
}

/// Wrapping step through `len` choices; no current choice starts at an end.
fn step(current: Option<usize>, len: usize, direction: isize) -> usize {
    match current {
        Some(i) => (i as isize + direction).rem_euclid(len as isize) as usize,
        None if direction < 0 => len - 1,
        None => 0,
    }
}

fn handle_trades_key(app: &mut AppState, key: KeyEvent) {
    let count = app.trades.trades.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.trades.cursor + 1 < count {
                app.trades.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.trades.cursor = app.trades.cursor.saturating_sub(1);
        }
        KeyCode::Home | KeyCode::Char('g') => app.trades.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => app.trades.cursor = count.saturating_sub(1),
        _ => {}
    }
}
