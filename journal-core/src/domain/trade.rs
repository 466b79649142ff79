//! Trade — a closed trade as stored by the journal backend.
//!
//! Records are consumed verbatim: nothing here validates them. A missing
//! `net_profit` becomes NaN and flows through every aggregation unchanged,
//! and a missing or unparseable timestamp becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeType {
    Buy,
    Sell,
    /// Anything the backend stored that is not buy/sell.
    Other(String),
}

impl TradeType {
    pub fn as_str(&self) -> &str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
            TradeType::Other(raw) => raw,
        }
    }
}

impl From<String> for TradeType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => TradeType::Buy,
            "SELL" => TradeType::Sell,
            _ => TradeType::Other(raw),
        }
    }
}

impl From<&str> for TradeType {
    fn from(raw: &str) -> Self {
        TradeType::from(raw.to_string())
    }
}

impl From<TradeType> for String {
    fn from(t: TradeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade record as returned by `GET /trades/user/{user_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Backend identity ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    // ── Instrument ──
    #[serde(default, deserialize_with = "empty_when_null")]
    pub symbol: String,
    #[serde(rename = "type", default)]
    pub trade_type: Option<TradeType>,
    #[serde(default, deserialize_with = "zero_when_null")]
    pub volume: f64,

    // ── Prices ──
    #[serde(default, deserialize_with = "zero_when_null")]
    pub price_open: f64,
    #[serde(default, deserialize_with = "zero_when_null")]
    pub price_close: f64,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,

    // ── Result ──
    #[serde(default, deserialize_with = "zero_when_null")]
    pub profit_amount: f64,
    #[serde(default, deserialize_with = "zero_when_null")]
    pub loss_amount: f64,
    /// Signed realized P/L. The only figure the analytics look at.
    #[serde(default = "nan", deserialize_with = "nan_when_null")]
    pub net_profit: f64,

    // ── Review notes ──
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub mistake: Option<String>,

    // ── Timestamps ──
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub open_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub close_time: Option<DateTime<Utc>>,
}

impl Trade {
    /// Strictly positive result. Zero and NaN are not wins.
    pub fn is_win(&self) -> bool {
        self.net_profit > 0.0
    }

    /// Zero counts as a loss. NaN counts as neither.
    pub fn is_loss(&self) -> bool {
        self.net_profit <= 0.0
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn nan_when_null<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

fn empty_when_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn zero_when_null<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .as_deref()
        .and_then(parse_wire_timestamp))
}

/// Parse a timestamp as the backend sends it.
///
/// The backend stores naive datetimes, so values usually arrive without an
/// offset; those are taken as UTC. RFC 3339 values keep their offset.
pub fn parse_wire_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
