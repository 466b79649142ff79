//! Entry form → backend → analytics, against an in-memory backend.

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use journal_core::domain::CUSTOM_MISTAKE;
use journal_core::form::Field;
use journal_core::{
    Analytics, ApiError, AuthUser, NewTrade, Session, SubmitError, Trade, TradeApi, TradeForm,
    TradeType,
};

#[derive(Default)]
struct MemoryBackend {
    rows: Mutex<Vec<NewTrade>>,
    reject_symbol: Option<String>,
}

impl TradeApi for MemoryBackend {
    fn login(&self, _email: &str, _password: &str) -> Result<Session, ApiError> {
        Err(ApiError::Status {
            status: 401,
            detail: Some("Invalid credentials".into()),
        })
    }

    fn create_trade(&self, trade: &NewTrade) -> Result<(), ApiError> {
        if self.reject_symbol.as_deref() == Some(trade.symbol.as_str()) {
            return Err(ApiError::Status {
                status: 400,
                detail: Some(format!("Symbol {} is not tradable", trade.symbol)),
            });
        }
        self.rows.lock().unwrap().push(trade.clone());
        Ok(())
    }

    fn trades_for_user(&self, user_id: &str) -> Result<Vec<Trade>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .enumerate()
            .map(|(i, t)| Trade {
                id: Some(i as i64 + 1),
                user_id: Some(t.user_id.clone()),
                symbol: t.symbol.clone(),
                trade_type: Some(TradeType::from(t.trade_type.as_str())),
                net_profit: t.net_profit,
                mistake: Some(t.mistake.clone()),
                open_time: Some(t.open_time),
                close_time: Some(t.close_time),
                ..Trade::default()
            })
            .collect())
    }

    fn set_token(&mut self, _token: Option<String>) {}
}

fn session() -> Session {
    Session {
        access_token: "tok".into(),
        token_type: "bearer".into(),
        user: AuthUser {
            user_id: "USR001".into(),
            email: None,
            first_name: None,
            last_name: None,
            role: None,
        },
    }
}

fn enter(form: &mut TradeForm, symbol: &str, net: &str, close: &str) {
    form.set(Field::Symbol, symbol);
    form.set(Field::TradeType, "BUY");
    form.set(Field::NetProfit, net);
    form.set(Field::CloseTime, close);
}

#[test]
fn submitted_trades_drive_analytics() {
    let api = MemoryBackend::default();
    let session = session();
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    let mut form = TradeForm::new();

    for (symbol, net, close) in [
        ("GBP/USD", "3", "2024-03-03T10:00:00Z"),
        ("EUR/USD", "10", "2024-03-01T10:00:00Z"),
        ("EUR/USD", "-5", "2024-03-02T10:00:00Z"),
    ] {
        enter(&mut form, symbol, net, close);
        let outcome = form.submit(Some(&session), &api, now).unwrap();
        assert!(outcome.reload);
        assert_eq!(form, TradeForm::new());
    }

    let trades = api.trades_for_user(session.user_id()).unwrap();
    let a = Analytics::compute(&trades);

    let equity: Vec<f64> = a.equity_curve.iter().map(|p| p.equity).collect();
    assert_eq!(equity, vec![10.0, 5.0, 8.0]);
    assert_eq!((a.win_loss.wins, a.win_loss.losses), (2, 1));
    assert_eq!(a.summary.win_rate, "66.7");
    assert_eq!(a.summary.total_pl_display(), "$8.00");

    let perf: Vec<(&str, f64, usize)> = a
        .symbol_performance
        .iter()
        .map(|p| (p.symbol.as_str(), p.profit, p.trades))
        .collect();
    assert_eq!(perf, vec![("GBP/USD", 3.0, 1), ("EUR/USD", 5.0, 2)]);
}

#[test]
fn rejected_trade_keeps_the_form_and_nothing_is_stored() {
    let api = MemoryBackend {
        reject_symbol: Some("XAU/USD".into()),
        ..MemoryBackend::default()
    };
    let mut form = TradeForm::new();
    enter(&mut form, "XAU/USD", "12.5", "");
    form.set_custom_mistake("chased the move");
    form.select_mistake(CUSTOM_MISTAKE);
    let before = form.clone();

    let err = form
        .submit(Some(&session()), &api, Utc::now())
        .unwrap_err();
    assert!(matches!(err, SubmitError::Api(_)));
    assert_eq!(err.user_message(), "Symbol XAU/USD is not tradable");
    assert_eq!(form, before);
    assert!(api.trades_for_user("USR001").unwrap().is_empty());
}
