//! Journal backend access.
//!
//! The `TradeApi` trait abstracts over the backend so the entry form, the
//! TUI worker and the tests can share one seam. `JournalClient` is the HTTP
//! implementation.

pub mod client;
pub mod error;

pub use client::{JournalClient, TradeApi};
pub use error::{extract_detail, ApiError};
