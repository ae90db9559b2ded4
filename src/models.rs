//! Wire Models
//!
//! Shapes decoded from the Alby `/invoices/incoming` endpoint.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`InvoiceRecord`] - one item of a paginated invoice list
//! 2. **Attribution**: [`Boostagram`] - optional podcasting metadata carried by the invoice
//! 3. **Paging**: [`Page`] - decoded items plus the pagination headers of the response
//! 4. **Failures**: [`ErrorResponse`] - structured error body returned by the API
//!
//! Dates on the wire are seconds since the Unix epoch, not ISO-8601 strings.
//! Bookkeeping fields the report never reads are optional so that a `null`
//! from the server does not fail the whole page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub amount: i64,
    pub boostagram: Option<Boostagram>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub custom_records: Option<HashMap<String, String>>,
    #[serde(default)]
    pub description_hash: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub expiry: Option<i64>,
    pub identifier: String,
    #[serde(default)]
    pub keysend_message: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub payer_pubkey: Option<String>,
    #[serde(default)]
    pub payment_hash: Option<String>,
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default)]
    pub r_hash_str: Option<String>,
    #[serde(default)]
    pub settled: Option<bool>,
    #[serde(default)]
    pub settled_at: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Stream,
    Boost,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Stream => "stream",
            ActionType::Boost => "boost",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boostagram {
    pub action: ActionType,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub boost_link: Option<String>,
    #[serde(default)]
    pub episode: Option<String>,
    #[serde(default)]
    pub episode_guid: Option<String>,
    #[serde(default, rename = "feedID")]
    pub feed_id: Option<i64>,
    #[serde(default, rename = "itemID")]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub podcast: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    /// Playback position in seconds.
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    /// Amount in millisatoshis; supersedes the invoice amount when present.
    #[serde(default)]
    pub value_msat_total: Option<i64>,
}

/// The `error` field is `true` on the live API but documented as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorFlag {
    Flag(bool),
    Text(String),
}

impl fmt::Display for ErrorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorFlag::Flag(flag) => write!(f, "{flag}"),
            ErrorFlag::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub error: ErrorFlag,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: T,
    pub current_page: Option<u32>,
    pub page_count: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(items: T) -> Self {
        Self {
            items,
            current_page: None,
            page_count: None,
        }
    }
}
