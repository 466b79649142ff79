//! NewTrade — the body of `POST /trades`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully coerced trade ready to be sent to the backend.
///
/// Built by [`crate::form::TradeForm::build_payload`]; every numeric field
/// already has its zero fallback applied. `trade_type` is whatever the user
/// picked and may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    pub user_id: String,
    pub symbol: String,
    pub volume: f64,
    pub price_open: f64,
    pub price_close: f64,
    #[serde(rename = "type")]
    pub trade_type: String,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub profit_amount: f64,
    pub loss_amount: f64,
    pub net_profit: f64,
    pub reason: String,
    pub mistake: String,
    #[serde(with = "iso_millis")]
    pub open_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub close_time: DateTime<Utc>,
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-01T09:00:00.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
