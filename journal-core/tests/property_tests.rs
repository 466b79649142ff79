//! Property tests for the aggregation and coercion invariants.
//!
//! 1. Win/loss split covers every trade (zero counts as a loss)
//! 2. Per-symbol totals partition the trade list
//! 3. Equity curve ends at the total and ignores input order
//! 4. Best/worst bracket zero
//! 5. Form number coercion never yields NaN

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use journal_core::analytics::{equity_curve, summary, symbol_performance, win_loss};
use journal_core::form::coerce_number;
use journal_core::Trade;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbol() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["EUR/USD", "GBP/USD", "XAU/USD", "USD/JPY"]).prop_map(String::from)
}

/// Whole cents keep float sums exact enough to compare.
fn arb_profit() -> impl Strategy<Value = f64> {
    (-50_000i64..50_000).prop_map(|c| c as f64 / 100.0)
}

fn arb_trades() -> impl Strategy<Value = Vec<Trade>> {
    prop::collection::vec((arb_symbol(), arb_profit()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (symbol, net))| Trade {
                symbol,
                net_profit: net,
                close_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(i as i64)),
                ..Trade::default()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn win_loss_covers_every_trade(trades in arb_trades()) {
        let split = win_loss(&trades);
        prop_assert_eq!(split.total(), trades.len());
        let zeros = trades.iter().filter(|t| t.net_profit == 0.0).count();
        prop_assert!(split.losses >= zeros);
    }

    #[test]
    fn symbol_totals_partition_the_list(trades in arb_trades()) {
        let perf = symbol_performance(&trades);
        let count: usize = perf.iter().map(|p| p.trades).sum();
        prop_assert_eq!(count, trades.len());

        let total: f64 = perf.iter().map(|p| p.profit).sum();
        prop_assert!((total - summary(&trades).total_pl).abs() < 1e-6);

        let mut seen: Vec<&str> = Vec::new();
        for t in &trades {
            if !seen.contains(&t.symbol.as_str()) {
                seen.push(&t.symbol);
            }
        }
        let order: Vec<&str> = perf.iter().map(|p| p.symbol.as_str()).collect();
        prop_assert_eq!(order, seen);
    }

    #[test]
    fn equity_curve_ends_at_total(trades in arb_trades()) {
        let curve = equity_curve(&trades);
        prop_assert_eq!(curve.len(), trades.len());
        if let Some(last) = curve.last() {
            let total = summary(&trades).total_pl;
            prop_assert!((last.equity - total).abs() < 0.005 + 1e-9);
        }
    }

    #[test]
    fn equity_curve_ignores_input_order(trades in arb_trades()) {
        let mut reversed = trades.clone();
        reversed.reverse();
        prop_assert_eq!(equity_curve(&trades), equity_curve(&reversed));
    }

    #[test]
    fn best_and_worst_bracket_zero(trades in arb_trades()) {
        let s = summary(&trades);
        prop_assert!(s.best_trade >= 0.0);
        prop_assert!(s.worst_trade <= 0.0);
        for t in &trades {
            prop_assert!(t.net_profit <= s.best_trade);
            prop_assert!(t.net_profit >= s.worst_trade);
        }
    }

    #[test]
    fn win_rate_is_a_percentage(trades in arb_trades()) {
        let s = summary(&trades);
        let rate: f64 = s.win_rate.parse().unwrap();
        prop_assert!((0.0..=100.0).contains(&rate));
    }

    #[test]
    fn coercion_never_yields_nan(raw in ".{0,12}") {
        prop_assert!(!coerce_number(&raw).is_nan());
    }

    #[test]
    fn coercion_reads_formatted_numbers(cents in -10_000_000i64..10_000_000) {
        let v = cents as f64 / 100.0;
        prop_assert_eq!(coerce_number(&format!("{v}")), v);
    }
}
