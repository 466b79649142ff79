//! Trade analytics — equity curve, win/loss split, per-symbol totals and
//! summary statistics.
//!
//! Everything here is a pure function of the trade list. NaN net profits
//! are not filtered: they flow into sums and extrema, and they count as
//! neither win nor loss.

use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Label used for trades without a usable close time.
pub const INVALID_DATE: &str = "Invalid Date";

/// One point of the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Local calendar date of the close, `M/D/YYYY`.
    pub date: String,
    pub close_time: Option<DateTime<Utc>>,
    /// Cumulative net profit up to and including this trade, to 2 decimals.
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    pub wins: usize,
    pub losses: usize,
}

impl WinLoss {
    pub fn total(&self) -> usize {
        self.wins + self.losses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    pub symbol: String,
    pub profit: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_pl: f64,
    /// Win percentage with one decimal, or `"0"` with no trades.
    pub win_rate: String,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub trade_count: usize,
}

impl SummaryStats {
    pub fn total_pl_display(&self) -> String {
        format_usd(self.total_pl)
    }

    pub fn win_rate_display(&self) -> String {
        format!("{}%", self.win_rate)
    }

    pub fn best_trade_display(&self) -> String {
        format!("+{}", format_usd(self.best_trade))
    }

    pub fn worst_trade_display(&self) -> String {
        format_usd(self.worst_trade)
    }
}

/// All four views over one trade list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub equity_curve: Vec<EquityPoint>,
    pub win_loss: WinLoss,
    pub symbol_performance: Vec<SymbolPerformance>,
    pub summary: SummaryStats,
}

impl Analytics {
    pub fn compute(trades: &[Trade]) -> Self {
        Self {
            equity_curve: equity_curve(trades),
            win_loss: win_loss(trades),
            symbol_performance: symbol_performance(trades),
            summary: summary(trades),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.trade_count == 0
    }
}

/// Running net profit in close-time order.
///
/// Trades without a close time sort first. Only the emitted value is
/// rounded; the running sum keeps full precision.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityPoint> {
    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by_key(|t| t.close_time);

    let mut running = 0.0;
    sorted
        .into_iter()
        .map(|t| {
            running += t.net_profit;
            EquityPoint {
                date: date_label(t.close_time),
                close_time: t.close_time,
                equity: round2(running),
            }
        })
        .collect()
}

/// Zero is a loss. NaN is neither.
pub fn win_loss(trades: &[Trade]) -> WinLoss {
    trades.iter().fold(WinLoss::default(), |mut acc, t| {
        if t.is_win() {
            acc.wins += 1;
        } else if t.is_loss() {
            acc.losses += 1;
        }
        acc
    })
}

/// Net profit and trade count per symbol, in first-seen order.
pub fn symbol_performance(trades: &[Trade]) -> Vec<SymbolPerformance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<SymbolPerformance> = Vec::new();

    for t in trades {
        let i = *index.entry(t.symbol.as_str()).or_insert_with(|| {
            out.push(SymbolPerformance {
                symbol: t.symbol.clone(),
                profit: 0.0,
                trades: 0,
            });
            out.len() - 1
        });
        out[i].profit += t.net_profit;
        out[i].trades += 1;
    }
    out
}

pub fn summary(trades: &[Trade]) -> SummaryStats {
    let total_pl: f64 = trades.iter().map(|t| t.net_profit).sum();
    let wins = trades.iter().filter(|t| t.is_win()).count();

    let win_rate = if trades.is_empty() {
        "0".to_string()
    } else {
        to_fixed(wins as f64 / trades.len() as f64 * 100.0, 1)
    };

    let profits = || trades.iter().map(|t| t.net_profit);
    SummaryStats {
        total_pl,
        win_rate,
        best_trade: profits().fold(0.0, nan_max),
        worst_trade: profits().fold(0.0, nan_min),
        trade_count: trades.len(),
    }
}

/// `$12.34`, `$-5.00`.
pub fn format_usd(v: f64) -> String {
    format!("${}", to_fixed(v, 2))
}

/// Fixed-point text the way JavaScript's `Number.prototype.toFixed` writes it.
///
/// Rounds the exact binary value, with ties going away from zero, so
/// `0.125` gives `"0.13"` while `2.675` (really `2.67499...`) gives `"2.67"`.
/// Negative values keep their sign even when they round to zero.
pub fn to_fixed(v: f64, digits: usize) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    if v.abs() >= 1e21 {
        return format!("{v}");
    }

    // 60 places is exact past any tie for magnitudes below 1e21.
    let exact = format!("{:.60}", v.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac.as_bytes();

    let mut out: Vec<u8> = int_part.bytes().collect();
    out.extend((0..digits).map(|i| frac.get(i).copied().unwrap_or(b'0')));

    if frac.get(digits).is_some_and(|d| *d >= b'5') {
        let mut i = out.len();
        loop {
            if i == 0 {
                out.insert(0, b'1');
                break;
            }
            i -= 1;
            if out[i] == b'9' {
                out[i] = b'0';
            } else {
                out[i] += 1;
                break;
            }
        }
    }

    let split = out.len() - digits;
    let mut text = String::with_capacity(out.len() + 2);
    if v < 0.0 {
        text.push('-');
    }
    text.extend(out[..split].iter().map(|b| *b as char));
    if digits > 0 {
        text.push('.');
        text.extend(out[split..].iter().map(|b| *b as char));
    }
    text
}

/// Local-date label for an equity point.
pub fn date_label(close_time: Option<DateTime<Utc>>) -> String {
    match close_time {
        Some(t) => t.with_timezone(&Local).format("%-m/%-d/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `parseFloat(v.toFixed(2))`.
fn round2(v: f64) -> f64 {
    to_fixed(v, 2).parse().unwrap_or(v)
}

// f64::max/min ignore NaN; these propagate it.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}
