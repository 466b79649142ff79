//! Blocking HTTP client for the journal backend.
//!
//! One request per call: no retries, no backoff, no caching. Failures come
//! back as [`ApiError`] with the backend's `detail` message attached when the
//! response carried one.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::Serialize;

use super::error::{extract_detail, ApiError};
use crate::config::ApiConfig;
use crate::domain::{NewTrade, Trade};
use crate::session::Session;

/// Backend operations the journal needs.
pub trait TradeApi: Send + Sync {
    /// Exchange credentials for a session.
    fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// `POST /trades`.
    fn create_trade(&self, trade: &NewTrade) -> Result<(), ApiError>;

    /// `GET /trades/user/{user_id}`, consumed verbatim.
    fn trades_for_user(&self, user_id: &str) -> Result<Vec<Trade>, ApiError>;

    /// Bearer token for subsequent requests; `None` after logout.
    fn set_token(&mut self, token: Option<String>);
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// reqwest-backed [`TradeApi`].
#[derive(Debug, Clone)]
pub struct JournalClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl JournalClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            ApiError::InvalidRequest(format!("bad base URL {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("trade-journal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidRequest("base URL cannot carry a path".into())
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: extract_detail(&body),
        })
    }
}

impl TradeApi for JournalClient {
    fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        tracing::debug!(%url, email, "logging in");
        let resp = self.send(self.http.post(url).json(&LoginRequest { email, password }))?;
        resp.json::<Session>()
            .map_err(|e| ApiError::Decode(format!("login response: {e}")))
    }

    fn create_trade(&self, trade: &NewTrade) -> Result<(), ApiError> {
        let url = self.endpoint(&["trades"])?;
        tracing::debug!(%url, symbol = %trade.symbol, "creating trade");
        self.send(self.http.post(url).json(trade))?;
        Ok(())
    }

    fn trades_for_user(&self, user_id: &str) -> Result<Vec<Trade>, ApiError> {
        let url = self.endpoint(&["trades", "user", user_id])?;
        tracing::debug!(%url, "fetching trades");
        let resp = self.send(self.http.get(url))?;
        resp.json::<Vec<Trade>>()
            .map_err(|e| ApiError::Decode(format!("trade list: {e}")))
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> JournalClient {
        JournalClient::new(&ApiConfig {
            base_url: base.into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoints_join_under_base_path() {
        let c = client("http://localhost:8000/api");
        assert_eq!(
            c.endpoint(&["trades"]).unwrap().as_str(),
            "http://localhost:8000/api/trades"
        );
        let c = client("http://localhost:8000/api/");
        assert_eq!(
            c.endpoint(&["trades", "user", "USR001"]).unwrap().as_str(),
            "http://localhost:8000/api/trades/user/USR001"
        );
    }

    #[test]
    fn user_id_is_percent_encoded() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint(&["trades", "user", "a/b c"]).unwrap().as_str(),
            "http://localhost:8000/trades/user/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = JournalClient::new(&ApiConfig {
            base_url: "not a url".into(),
            timeout_secs: 5,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let err = JournalClient::new(&ApiConfig {
            base_url: "mailto:trader@example.com".into(),
            timeout_secs: 5,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
