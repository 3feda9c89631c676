//! Append-only audit records: medicine searches and inbound SMS requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct SearchLog {
    pub id: i64,
    /// `None` for anonymous searches.
    pub account_id: Option<i64>,
    pub medicine_name: String,
    pub timestamp: DateTime<Utc>,
    pub result_found: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSearchLog {
    #[serde(skip)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub result_found: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct SearchLogFilter {
    pub result_found: Option<bool>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct SmsRequest {
    pub id: i64,
    pub phone_number: String,
    pub medicine_name: String,
    pub location: String,
    pub response_sent: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSmsRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct SmsRequestFilter {
    pub response_sent: Option<bool>,
}
