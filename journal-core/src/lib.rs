//! Trade Journal Core — domain types, entry form, analytics, backend client.
//!
//! This crate holds everything the terminal app and the CLI share:
//! - Trade records as served by the journal backend, and the creation payload
//! - Entry form state with numeric/date coercion and the submit workflow
//! - Analytics over a user's trades (equity curve, win/loss, per-symbol, summary)
//! - Blocking HTTP client for the backend, behind the `TradeApi` trait
//! - Session store, TOML configuration, logging setup, CSV export

pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod export;
pub mod form;
pub mod logging;
pub mod session;

pub use analytics::{Analytics, EquityPoint, SummaryStats, SymbolPerformance, WinLoss};
pub use api::{ApiError, JournalClient, TradeApi};
pub use config::{ConfigError, JournalConfig};
pub use domain::{NewTrade, Trade, TradeType};
pub use export::ExportError;
pub use form::{Field, SubmitError, SubmitOutcome, TradeForm};
pub use session::{AuthUser, Session, SessionError, SessionStore};
