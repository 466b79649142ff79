//! Trade entry form — raw string inputs, coercion, and the submit workflow.
//!
//! The form holds a flat field → string mapping exactly as typed. Nothing is
//! validated while editing; coercion happens once, at submission:
//! - numeric fields parse leniently (leading number, like `parseFloat`) and
//!   fall back to 0
//! - blank open/close times default to the submission instant, and a time
//!   that does not parse fails the submission before anything is sent
//!
//! Submission is split in two halves so a host that runs the network call
//! elsewhere (the TUI worker) can share the bookkeeping:
//! [`TradeForm::begin_submit`] checks the login precondition and builds the
//! payload, [`TradeForm::finish_submit`] resets the form on success or leaves
//! it untouched on failure. [`TradeForm::submit`] runs both around a
//! blocking [`TradeApi`] call.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiError, TradeApi};
use crate::domain::{NewTrade, CUSTOM_MISTAKE, NO_MISTAKE};
use crate::session::Session;

pub const NOT_LOGGED_IN: &str = "You must be logged in to add trades.";
pub const SAVE_FAILED: &str = "Failed to save trade.";

/// One input of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Volume,
    PriceOpen,
    PriceClose,
    TradeType,
    TakeProfit,
    StopLoss,
    ProfitAmount,
    LossAmount,
    NetProfit,
    Reason,
    Mistake,
    OpenTime,
    CloseTime,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Symbol,
        Field::Volume,
        Field::PriceOpen,
        Field::PriceClose,
        Field::TradeType,
        Field::TakeProfit,
        Field::StopLoss,
        Field::ProfitAmount,
        Field::LossAmount,
        Field::NetProfit,
        Field::Reason,
        Field::Mistake,
        Field::OpenTime,
        Field::CloseTime,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Volume => "volume",
            Field::PriceOpen => "price_open",
            Field::PriceClose => "price_close",
            Field::TradeType => "type",
            Field::TakeProfit => "take_profit",
            Field::StopLoss => "stop_loss",
            Field::ProfitAmount => "profit_amount",
            Field::LossAmount => "loss_amount",
            Field::NetProfit => "net_profit",
            Field::Reason => "reason",
            Field::Mistake => "mistake",
            Field::OpenTime => "open_time",
            Field::CloseTime => "close_time",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Symbol => "Symbol",
            Field::Volume => "Volume (Lots)",
            Field::PriceOpen => "Open Price",
            Field::PriceClose => "Close Price",
            Field::TradeType => "Type",
            Field::TakeProfit => "Take Profit",
            Field::StopLoss => "Stop Loss",
            Field::ProfitAmount => "Profit Amount",
            Field::LossAmount => "Loss Amount",
            Field::NetProfit => "Net Profit",
            Field::Reason => "Reason",
            Field::Mistake => "Mistake",
            Field::OpenTime => "Open Time",
            Field::CloseTime => "Close Time",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Symbol => "Select symbol...",
            Field::Volume => "0.01",
            Field::PriceOpen => "1.08500",
            Field::PriceClose => "1.08700",
            Field::TradeType => "Select type",
            Field::TakeProfit => "1.09000",
            Field::StopLoss => "1.08200",
            Field::ProfitAmount | Field::LossAmount | Field::NetProfit => "0.00",
            Field::Reason => "Why did you take this trade?",
            Field::Mistake => "",
            Field::OpenTime | Field::CloseTime => "YYYY-MM-DDTHH:MM",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::Volume
                | Field::PriceOpen
                | Field::PriceClose
                | Field::TakeProfit
                | Field::StopLoss
                | Field::ProfitAmount
                | Field::LossAmount
                | Field::NetProfit
        )
    }

    pub fn is_datetime(self) -> bool {
        matches!(self, Field::OpenTime | Field::CloseTime)
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{NOT_LOGGED_IN}")]
    NotLoggedIn,

    #[error("a trade is already being saved")]
    InFlight,

    /// A non-blank open/close time that does not parse.
    #[error("{SAVE_FAILED}")]
    InvalidTime(Field),

    #[error("{}", api_message(.0))]
    Api(#[from] ApiError),
}

fn api_message(e: &ApiError) -> String {
    e.user_message(SAVE_FAILED)
}

impl SubmitError {
    /// Text for the error notification.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// A saved trade. The host is expected to reload every view that depends
/// on the trade list when `reload` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub symbol: String,
    pub reload: bool,
}

impl SubmitOutcome {
    pub fn message(&self) -> String {
        format!("Trade for {} has been recorded.", self.symbol)
    }
}

/// Entry form state.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeForm {
    values: BTreeMap<Field, String>,
    selected_mistake: String,
    custom_mistake: String,
    is_loading: bool,
}

impl Default for TradeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeForm {
    pub fn new() -> Self {
        let mut values: BTreeMap<Field, String> =
            Field::ALL.into_iter().map(|f| (f, String::new())).collect();
        values.insert(Field::Mistake, NO_MISTAKE.to_string());
        Self {
            values,
            selected_mistake: NO_MISTAKE.to_string(),
            custom_mistake: String::new(),
            is_loading: false,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Mutable access for in-place editing (typing, backspace).
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        self.values.entry(field).or_default()
    }

    pub fn selected_mistake(&self) -> &str {
        &self.selected_mistake
    }

    pub fn custom_mistake(&self) -> &str {
        &self.custom_mistake
    }

    pub fn is_custom_mistake(&self) -> bool {
        self.selected_mistake == CUSTOM_MISTAKE
    }

    /// Pick a mistake category. "Custom" binds the free-text value instead
    /// of the category name; any other choice discards the free text.
    pub fn select_mistake(&mut self, choice: &str) {
        self.selected_mistake = choice.to_string();
        if choice == CUSTOM_MISTAKE {
            let custom = self.custom_mistake.clone();
            self.set(Field::Mistake, custom);
        } else {
            self.set(Field::Mistake, choice);
            self.custom_mistake.clear();
        }
    }

    pub fn set_custom_mistake(&mut self, text: impl Into<String>) {
        self.custom_mistake = text.into();
        let custom = self.custom_mistake.clone();
        self.set(Field::Mistake, custom);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Back to the initial empty state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Coerce the current inputs into a creation payload.
    ///
    /// Blank times become `now`; any other time that fails to parse is an
    /// [`SubmitError::InvalidTime`].
    pub fn build_payload(&self, user_id: &str, now: DateTime<Utc>) -> Result<NewTrade, SubmitError> {
        let num = |f: Field| coerce_number(self.get(f));
        let open_time = self.resolve_time(Field::OpenTime, now)?;
        let close_time = self.resolve_time(Field::CloseTime, now)?;
        Ok(NewTrade {
            user_id: user_id.to_string(),
            symbol: self.get(Field::Symbol).to_string(),
            volume: num(Field::Volume),
            price_open: num(Field::PriceOpen),
            price_close: num(Field::PriceClose),
            trade_type: self.get(Field::TradeType).to_string(),
            take_profit: num(Field::TakeProfit),
            stop_loss: num(Field::StopLoss),
            profit_amount: num(Field::ProfitAmount),
            loss_amount: num(Field::LossAmount),
            net_profit: num(Field::NetProfit),
            reason: self.get(Field::Reason).to_string(),
            mistake: self.get(Field::Mistake).to_string(),
            open_time,
            close_time,
        })
    }

    fn resolve_time(&self, field: Field, now: DateTime<Utc>) -> Result<DateTime<Utc>, SubmitError> {
        let raw = self.get(field);
        if raw.trim().is_empty() {
            return Ok(now);
        }
        parse_input_datetime(raw).ok_or_else(|| {
            tracing::error!(field = field.key(), input = raw, "error creating trade: invalid time");
            SubmitError::InvalidTime(field)
        })
    }

    /// Check the login precondition and build the payload.
    ///
    /// On error nothing about the form changes.
    pub fn begin_submit(
        &mut self,
        session: Option<&Session>,
        now: DateTime<Utc>,
    ) -> Result<NewTrade, SubmitError> {
        if self.is_loading {
            return Err(SubmitError::InFlight);
        }
        let user_id = match session.map(Session::user_id) {
            Some(id) if !id.is_empty() => id,
            _ => {
                tracing::warn!("trade submission blocked: no authenticated user");
                return Err(SubmitError::NotLoggedIn);
            }
        };
        let payload = self.build_payload(user_id, now)?;
        self.is_loading = true;
        Ok(payload)
    }

    /// Drop an in-flight submission whose request never went out.
    pub fn abort_submit(&mut self) {
        self.is_loading = false;
    }

    /// Apply the backend's answer to a submission started with
    /// [`TradeForm::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> Result<SubmitOutcome, SubmitError> {
        self.is_loading = false;
        match result {
            Ok(()) => {
                let symbol = self.get(Field::Symbol).to_string();
                self.reset();
                tracing::info!(%symbol, "trade recorded");
                Ok(SubmitOutcome { symbol, reload: true })
            }
            Err(e) => {
                tracing::error!(error = %e, "error creating trade");
                Err(SubmitError::Api(e))
            }
        }
    }

    /// Full blocking submission through `api`.
    pub fn submit(
        &mut self,
        session: Option<&Session>,
        api: &dyn TradeApi,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, SubmitError> {
        let payload = self.begin_submit(session, now)?;
        let result = api.create_trade(&payload);
        self.finish_submit(result)
    }
}

/// `parseFloat(raw) || 0`.
pub fn coerce_number(raw: &str) -> f64 {
    let v = parse_float_prefix(raw);
    if v.is_nan() || v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Parse the longest leading decimal literal, ignoring leading whitespace
/// and anything after the number. Returns NaN when there is no number.
pub fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().unwrap_or(f64::NAN);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Parse a date/time as typed into the form.
///
/// Offset-less values are local time; a bare date is UTC midnight.
pub fn parse_input_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const LOCAL_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
