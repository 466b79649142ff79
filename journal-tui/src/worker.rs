//! Background worker thread — every backend call runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Requests
//! are served one at a time in arrival order.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use journal_core::{ApiError, NewTrade, Session, Trade, TradeApi};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Login { email: String, password: String },
    SubmitTrade { payload: Box<NewTrade> },
    FetchTrades { user_id: String },
    SetToken(Option<String>),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    LoginDone(Result<Session, ApiError>),
    TradeSaved(Result<(), ApiError>),
    TradesLoaded {
        user_id: String,
        result: Result<Vec<Trade>, ApiError>,
    },
}

/// Spawn the background worker thread that owns `api`.
pub fn spawn_worker(
    api: Box<dyn TradeApi>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("journal-worker".into())
        .spawn(move || worker_loop(api, rx, tx))
}

fn worker_loop(mut api: Box<dyn TradeApi>, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        let resp = match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::SetToken(token)) => {
                api.set_token(token);
                continue;
            }
            Ok(WorkerCommand::Login { email, password }) => {
                WorkerResponse::LoginDone(api.login(&email, &password))
            }
            Ok(WorkerCommand::SubmitTrade { payload }) => {
                WorkerResponse::TradeSaved(api.create_trade(&payload))
            }
            Ok(WorkerCommand::FetchTrades { user_id }) => {
                let result = api.trades_for_user(&user_id);
                WorkerResponse::TradesLoaded { user_id, result }
            }
        };
        if tx.send(resp).is_err() {
            break;
        }
    }
    tracing::debug!("worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc, Mutex};
    use std::time::Duration;

    use chrono::Utc;
    use journal_core::TradeForm;

    /// Answers from memory and records the token it was given.
    #[derive(Default)]
    struct FakeApi {
        token: Arc<Mutex<Option<String>>>,
    }

    impl TradeApi for FakeApi {
        fn login(&self, email: &str, _password: &str) -> Result<Session, ApiError> {
            Err(ApiError::Status {
                status: 401,
                detail: Some(format!("no account for {email}")),
            })
        }

        fn create_trade(&self, trade: &NewTrade) -> Result<(), ApiError> {
            match self.token.lock().unwrap().as_deref() {
                Some(_) if trade.symbol == "EUR/USD" => Ok(()),
                Some(_) => Err(ApiError::Status {
                    status: 400,
                    detail: Some("unknown symbol".into()),
                }),
                None => Err(ApiError::Status {
                    status: 401,
                    detail: None,
                }),
            }
        }

        fn trades_for_user(&self, _user_id: &str) -> Result<Vec<Trade>, ApiError> {
            Ok(vec![Trade {
                symbol: "EUR/USD".into(),
                net_profit: 4.0,
                ..Trade::default()
            }])
        }

        fn set_token(&mut self, token: Option<String>) {
            *self.token.lock().unwrap() = token;
        }
    }

    fn start() -> (
        mpsc::Sender<WorkerCommand>,
        mpsc::Receiver<WorkerResponse>,
        JoinHandle<()>,
        Arc<Mutex<Option<String>>>,
    ) {
        let api = FakeApi::default();
        let token = api.token.clone();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(api), cmd_rx, resp_tx).unwrap();
        (cmd_tx, resp_rx, handle, token)
    }

    fn payload(symbol: &str) -> Box<NewTrade> {
        let mut form = TradeForm::new();
        form.set(journal_core::form::Field::Symbol, symbol);
        Box::new(form.build_payload("USR001", Utc::now()).unwrap())
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, _rx, handle, _) = start();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_stops_when_sender_drops() {
        let (cmd_tx, _rx, handle, _) = start();
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn token_applies_to_later_requests() {
        let (cmd_tx, rx, handle, token) = start();
        let timeout = Duration::from_secs(5);

        cmd_tx
            .send(WorkerCommand::SubmitTrade {
                payload: payload("EUR/USD"),
            })
            .unwrap();
        match rx.recv_timeout(timeout).unwrap() {
            WorkerResponse::TradeSaved(Err(e)) => assert!(e.is_unauthorized()),
            other => panic!("unexpected {other:?}"),
        }

        cmd_tx.send(WorkerCommand::SetToken(Some("tok".into()))).unwrap();
        cmd_tx
            .send(WorkerCommand::SubmitTrade {
                payload: payload("EUR/USD"),
            })
            .unwrap();
        assert!(matches!(
            rx.recv_timeout(timeout).unwrap(),
            WorkerResponse::TradeSaved(Ok(()))
        ));
        assert_eq!(token.lock().unwrap().as_deref(), Some("tok"));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn responses_carry_results() {
        let (cmd_tx, rx, handle, _) = start();
        let timeout = Duration::from_secs(5);

        cmd_tx
            .send(WorkerCommand::FetchTrades {
                user_id: "USR001".into(),
            })
            .unwrap();
        match rx.recv_timeout(timeout).unwrap() {
            WorkerResponse::TradesLoaded { user_id, result } => {
                assert_eq!(user_id, "USR001");
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        cmd_tx
            .send(WorkerCommand::Login {
                email: "a@b.c".into(),
                password: "x".into(),
            })
            .unwrap();
        match rx.recv_timeout(timeout).unwrap() {
            WorkerResponse::LoginDone(Err(e)) => {
                assert_eq!(e.user_message("Login failed."), "no account for a@b.c")
            }
            other => panic!("unexpected {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
