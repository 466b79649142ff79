//! JournalClient against a canned single-shot HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use chrono::{TimeZone, Utc};
use journal_core::config::ApiConfig;
use journal_core::{ApiError, JournalClient, NewTrade, TradeApi};

struct Captured {
    head: String,
    body: String,
}

/// Serve one response on a random port. Returns the base URL and a receiver
/// for the request the client sent.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break buf.len();
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                k.eq_ignore_ascii_case("content-length")
                    .then(|| v.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        tx.send(Captured { head, body }).unwrap();
    });

    (format!("http://{addr}/api"), rx)
}

fn client(base_url: String) -> JournalClient {
    JournalClient::new(&ApiConfig {
        base_url,
        timeout_secs: 5,
    })
    .unwrap()
}

fn payload() -> NewTrade {
    let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    NewTrade {
        user_id: "USR001".into(),
        symbol: "EUR/USD".into(),
        volume: 0.1,
        price_open: 1.085,
        price_close: 1.087,
        trade_type: "BUY".into(),
        take_profit: 0.0,
        stop_loss: 0.0,
        profit_amount: 20.0,
        loss_amount: 0.0,
        net_profit: 20.0,
        reason: String::new(),
        mistake: "No Mistake".into(),
        open_time: t,
        close_time: t,
    }
}

#[test]
fn login_posts_credentials_and_parses_session() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"access_token":"abc","token_type":"bearer","user":{"user_id":"USR001","email":"t@x.io"}}"#,
    );
    let session = client(base).login("t@x.io", "hunter2").unwrap();
    assert_eq!(session.access_token, "abc");
    assert_eq!(session.user_id(), "USR001");

    let req = rx.recv().unwrap();
    assert!(req.head.starts_with("POST /api/auth/login "));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["email"], "t@x.io");
    assert_eq!(body["password"], "hunter2");
}

#[test]
fn create_trade_sends_bearer_and_payload() {
    let (base, rx) = serve_once("201 Created", r#"{"id":1}"#);
    client(base)
        .with_token(Some("tok-1".into()))
        .create_trade(&payload())
        .unwrap();

    let req = rx.recv().unwrap();
    assert!(req.head.starts_with("POST /api/trades "));
    assert!(req
        .head
        .lines()
        .any(|l| l.eq_ignore_ascii_case("authorization: Bearer tok-1")));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["type"], "BUY");
    assert_eq!(body["user_id"], "USR001");
    assert_eq!(body["open_time"], "2024-03-01T09:30:00.000Z");
}

#[test]
fn backend_detail_is_surfaced() {
    let (base, _rx) = serve_once("400 Bad Request", r#"{"detail":"Trade number already exists"}"#);
    let err = client(base).create_trade(&payload()).unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 400,
            detail: Some("Trade number already exists".into())
        }
    );
    assert_eq!(err.user_message("Failed to save trade."), "Trade number already exists");
}

#[test]
fn validation_errors_fall_back_to_generic_message() {
    let (base, _rx) = serve_once(
        "422 Unprocessable Entity",
        r#"{"detail":[{"loc":["body","volume"],"msg":"field required"}]}"#,
    );
    let err = client(base).create_trade(&payload()).unwrap_err();
    assert_eq!(err.user_message("Failed to save trade."), "Failed to save trade.");
}

#[test]
fn trades_are_fetched_for_the_user() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"[
            {"id":1,"symbol":"EUR/USD","type":"BUY","net_profit":10.0,"close_time":"2024-03-01T10:00:00"},
            {"id":2,"symbol":"GBP/USD","type":"SELL","net_profit":null,"close_time":null}
        ]"#,
    );
    let trades = client(base).trades_for_user("USR001").unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].net_profit, 10.0);
    assert!(trades[1].net_profit.is_nan());
    assert!(trades[1].close_time.is_none());

    let req = rx.recv().unwrap();
    assert!(req.head.starts_with("GET /api/trades/user/USR001 "));
}

#[test]
fn undecodable_list_is_a_decode_error() {
    let (base, _rx) = serve_once("200 OK", r#"{"not":"a list"}"#);
    let err = client(base).trades_for_user("USR001").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn unreachable_backend_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(format!("http://{addr}/api"))
        .trades_for_user("USR001")
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message("Failed to save trade."), "Failed to save trade.");
}
