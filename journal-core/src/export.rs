//! CSV export of the trade list and the equity curve.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::analytics::EquityPoint;
use crate::domain::Trade;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

const TRADE_COLUMNS: [&str; 17] = [
    "id",
    "trade_no",
    "symbol",
    "type",
    "volume",
    "price_open",
    "price_close",
    "take_profit",
    "stop_loss",
    "profit_amount",
    "loss_amount",
    "net_profit",
    "reason",
    "mistake",
    "open_time",
    "close_time",
    "user_id",
];

/// Trades as CSV, one row per trade in list order. Absent values are empty.
pub fn trades_csv(trades: &[Trade]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(TRADE_COLUMNS)?;

    for t in trades {
        wtr.write_record([
            opt(t.id),
            opt(t.trade_no),
            t.symbol.clone(),
            t.trade_type.as_ref().map(|k| k.to_string()).unwrap_or_default(),
            t.volume.to_string(),
            t.price_open.to_string(),
            t.price_close.to_string(),
            opt(t.take_profit),
            opt(t.stop_loss),
            format!("{:.2}", t.profit_amount),
            format!("{:.2}", t.loss_amount),
            format!("{:.2}", t.net_profit),
            t.reason.clone().unwrap_or_default(),
            t.mistake.clone().unwrap_or_default(),
            timestamp(t.open_time),
            timestamp(t.close_time),
            t.user_id.clone().unwrap_or_default(),
        ])?;
    }

    finish(wtr)
}

/// Equity curve as `date,close_time,equity`.
pub fn equity_csv(curve: &[EquityPoint]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "close_time", "equity"])?;
    for p in curve {
        wtr.write_record([p.date.clone(), timestamp(p.close_time), format!("{:.2}", p.equity)])?;
    }
    finish(wtr)
}

/// Write `content` to `path`.
pub fn write_file(path: &Path, content: &str) -> Result<(), ExportError> {
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn timestamp(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
