//! Trade Journal TUI — four-panel terminal interface with vim-style navigation.
//!
//! Panels:
//! 1. Add Trade — the entry form, saved to the journal backend
//! 2. Analytics — summary cards, equity curve, win/loss split, P/L by symbol
//! 3. Trades — the logged-in user's trades as a table
//! 4. Help — keyboard shortcuts

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use journal_core::config::config_dir;
use journal_core::{logging, JournalClient, JournalConfig, SessionStore};

use crate::app::AppState;
use crate::worker::WorkerCommand;

fn main() -> Result<()> {
    // Restore the terminal before the default hook prints the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = JournalConfig::load(None).context("loading configuration")?;

    // stderr belongs to the terminal UI, so logs go to a file.
    let log_path = config.log_file();
    logging::init_file(&log_path, &config.log.filter).context("initializing logging")?;
    tracing::info!(base_url = %config.api.base_url, "starting journal-tui");

    // Paths
    let dir = config_dir();
    let session_store = SessionStore::in_dir(&dir);
    let state_path = dir.join("state.json");

    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let client = JournalClient::new(&config.api).context("building backend client")?;
    let worker_handle =
        worker::spawn_worker(Box::new(client), cmd_rx, resp_tx).context("spawning worker")?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, session_store, state_path);
    persistence::apply(&mut app, persisted);
    if let Some(session) = app.session_store.load() {
        tracing::info!(user_id = session.user_id(), "restored session");
        app.adopt_session(session);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&app.state_path, &persisted) {
        tracing::warn!(error = %e, "could not save UI state");
    }

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting journal-tui");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 50ms poll keeps worker responses flowing while idle.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
