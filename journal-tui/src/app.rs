//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. Network calls go through the worker thread;
//! their results come back through `handle_worker_response`.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use journal_core::domain::search_symbols;
use journal_core::form::Field;
use journal_core::{
    Analytics, ApiError, Session, SessionStore, SubmitError, Trade, TradeForm,
};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Entry,
    Analytics,
    Trades,
    Help,
}

impl Panel {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Entry => 0,
            Panel::Analytics => 1,
            Panel::Trades => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Entry),
            1 => Some(Panel::Analytics),
            2 => Some(Panel::Trades),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Entry => "Add Trade",
            Panel::Analytics => "Analytics",
            Panel::Trades => "Trades",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Entry)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Entry)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Network,
    Backend,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::Network => "NET",
            ErrorCategory::Backend => "API",
            ErrorCategory::Other => "ERR",
        }
    }

    fn of(err: &ApiError) -> Self {
        match err {
            ApiError::Network(_) => ErrorCategory::Network,
            e if e.is_unauthorized() => ErrorCategory::Auth,
            ApiError::Status { .. } | ApiError::Decode(_) => ErrorCategory::Backend,
            ApiError::InvalidRequest(_) => ErrorCategory::Other,
        }
    }
}

/// One navigable row of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRow {
    Field(Field),
    /// Free-text mistake, only shown while "Custom" is selected.
    CustomMistake,
    Save,
}

impl EntryRow {
    /// Rows whose value is typed rather than picked.
    pub fn is_text(self) -> bool {
        match self {
            EntryRow::Field(f) => !matches!(f, Field::Symbol | Field::TradeType | Field::Mistake),
            EntryRow::CustomMistake => true,
            EntryRow::Save => false,
        }
    }
}

/// Entry panel state.
#[derive(Debug, Default)]
pub struct EntryState {
    pub form: TradeForm,
    pub cursor: usize,
    pub editing: bool,
}

impl EntryState {
    pub fn rows(&self) -> Vec<EntryRow> {
        let mut rows = Vec::with_capacity(Field::ALL.len() + 2);
        for field in Field::ALL {
            rows.push(EntryRow::Field(field));
            if field == Field::Mistake && self.form.is_custom_mistake() {
                rows.push(EntryRow::CustomMistake);
            }
        }
        rows.push(EntryRow::Save);
        rows
    }

    pub fn current_row(&self) -> EntryRow {
        let rows = self.rows();
        rows.get(self.cursor).copied().unwrap_or(EntryRow::Save)
    }

    /// The string a text row edits.
    pub fn text_mut(&mut self, row: EntryRow) -> Option<&mut String> {
        match row {
            EntryRow::Field(f) if row.is_text() => Some(self.form.value_mut(f)),
            _ => None,
        }
    }
}

/// Trades and analytics fetched for the logged-in user.
#[derive(Debug)]
pub struct TradesState {
    pub trades: Vec<Trade>,
    pub analytics: Analytics,
    pub loading: bool,
    pub cursor: usize,
}

impl Default for TradesState {
    fn default() -> Self {
        Self {
            trades: Vec::new(),
            analytics: Analytics::compute(&[]),
            loading: false,
            cursor: 0,
        }
    }
}

impl TradesState {
    fn replace(&mut self, trades: Vec<Trade>) {
        self.analytics = Analytics::compute(&trades);
        self.trades = trades;
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Login overlay state.
#[derive(Debug, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub pending: bool,
}

/// Symbol picker overlay state.
#[derive(Debug, Default)]
pub struct PickerState {
    pub query: String,
    pub cursor: usize,
}

impl PickerState {
    pub fn matches(&self) -> Vec<&'static journal_core::domain::SymbolInfo> {
        search_symbols(&self.query)
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Login,
    SymbolPicker,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub entry: EntryState,
    pub trades: TradesState,
    pub login: LoginState,
    pub picker: PickerState,

    // Authentication
    pub session: Option<Session>,
    pub session_store: SessionStore,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        session_store: SessionStore,
        state_path: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Entry,
            running: true,
            entry: EntryState::default(),
            trades: TradesState::default(),
            login: LoginState::default(),
            picker: PickerState::default(),
            session: None,
            session_store,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            state_path,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn send(&mut self, cmd: WorkerCommand) -> bool {
        if self.worker_tx.send(cmd).is_err() {
            tracing::error!("worker channel closed");
            self.push_error(
                ErrorCategory::Other,
                "Background worker stopped; restart the app.".into(),
                String::new(),
            );
            return false;
        }
        true
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Adopt a session restored from disk or just obtained from login.
    pub fn adopt_session(&mut self, session: Session) {
        self.send(WorkerCommand::SetToken(Some(session.access_token.clone())));
        self.session = Some(session);
        self.request_trades();
    }

    pub fn open_login(&mut self) {
        self.login.password.clear();
        self.login.focus = LoginField::Email;
        self.overlay = Overlay::Login;
    }

    pub fn submit_login(&mut self) {
        if self.login.pending {
            return;
        }
        let email = self.login.email.trim().to_string();
        if email.is_empty() || self.login.password.is_empty() {
            self.set_warning("Email and password are required.");
            return;
        }
        let password = self.login.password.clone();
        if self.send(WorkerCommand::Login { email, password }) {
            self.login.pending = true;
            self.set_status("Logging in...");
        }
    }

    pub fn on_login(&mut self, result: Result<Session, ApiError>) {
        self.login.pending = false;
        match result {
            Ok(session) => {
                if let Err(e) = self.session_store.save(&session) {
                    tracing::warn!(error = %e, "could not persist session");
                }
                self.login.password.clear();
                self.overlay = Overlay::None;
                self.set_status(format!("Logged in as {}.", session.user.display_name()));
                tracing::info!(user_id = session.user_id(), "logged in");
                self.adopt_session(session);
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                let message = e.user_message("Login failed.");
                self.push_error(ErrorCategory::of(&e), message, "login".into());
            }
        }
    }

    pub fn logout(&mut self) {
        if self.session.take().is_none() {
            self.set_warning("Not logged in.");
            return;
        }
        if let Err(e) = self.session_store.clear() {
            tracing::warn!(error = %e, "could not remove session file");
        }
        self.send(WorkerCommand::SetToken(None));
        self.trades = TradesState::default();
        self.set_status("Logged out.");
    }

    // ── Trades ───────────────────────────────────────────────────────

    /// Refetch the user's trades. Without a session the views are cleared.
    pub fn request_trades(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user_id().to_string()) else {
            self.trades = TradesState::default();
            return;
        };
        if self.send(WorkerCommand::FetchTrades { user_id }) {
            self.trades.loading = true;
        }
    }

    pub fn on_trades_loaded(&mut self, user_id: &str, result: Result<Vec<Trade>, ApiError>) {
        let current = self.session.as_ref().map(Session::user_id);
        if current != Some(user_id) {
            tracing::debug!(user_id, "ignoring trades for a previous session");
            return;
        }
        self.trades.loading = false;
        match result {
            Ok(trades) => {
                tracing::debug!(count = trades.len(), "trades loaded");
                self.trades.replace(trades);
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching trades");
                self.trades.replace(Vec::new());
            }
        }
    }

    // ── Submission ───────────────────────────────────────────────────

    pub fn submit_trade(&mut self) {
        self.entry.editing = false;
        match self.entry.form.begin_submit(self.session.as_ref(), Utc::now()) {
            Ok(payload) => {
                if self.send(WorkerCommand::SubmitTrade {
                    payload: Box::new(payload),
                }) {
                    self.set_status("Saving trade...");
                } else {
                    self.entry.form.abort_submit();
                }
            }
            Err(SubmitError::InFlight) => self.set_warning("Still saving the previous trade..."),
            Err(e @ SubmitError::NotLoggedIn) => {
                self.push_error(ErrorCategory::Auth, e.user_message(), "add trade".into())
            }
            Err(e) => self.push_error(ErrorCategory::Other, e.user_message(), "add trade".into()),
        }
    }

    pub fn on_trade_saved(&mut self, result: Result<(), ApiError>) {
        let category = result.as_ref().err().map(ErrorCategory::of);
        match self.entry.form.finish_submit(result) {
            Ok(outcome) => {
                self.entry.cursor = 0;
                self.set_status(outcome.message());
                if outcome.reload {
                    self.request_trades();
                }
            }
            Err(e) => self.push_error(
                category.unwrap_or(ErrorCategory::Other),
                e.user_message(),
                "add trade".into(),
            ),
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::LoginDone(result) => self.on_login(result),
            WorkerResponse::TradeSaved(result) => self.on_trade_saved(result),
            WorkerResponse::TradesLoaded { user_id, result } => {
                self.on_trades_loaded(&user_id, result)
            }
        }
    }
}
