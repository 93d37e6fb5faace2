//! Domain DTOs for the DIA restaurant (`rst`) module.
//!
//! # Design
//! Inputs use English field names; the Turkish wire names live in the
//! `kart` records built by `protocol`. Responses are not modelled field by
//! field: DIA's result sets are passed through as JSON, wrapped in
//! `ApiResponse` for the few values callers routinely need.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when the caller does not pick one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Level code sent on update when the caller does not pick one.
pub const DEFAULT_LEVEL_CODE: u32 = 1;

/// Snapshot of the session and tenant scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub session_id: Option<String>,
    pub firma_kodu: u32,
    pub donem_kodu: u32,
}

/// Filter/sort/pagination arguments shared by the `*_listele` operations.
///
/// `filters`, `sorts` and `params` are forwarded verbatim; DIA accepts either
/// an empty string or a structured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub filters: Value,
    pub sorts: Value,
    pub params: Value,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: empty(),
            sorts: empty(),
            params: empty(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(mut self, filters: Value) -> Self {
        self.filters = filters;
        self
    }

    pub fn sorts(mut self, sorts: Value) -> Self {
        self.sorts = sorts;
        self
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Party size of a reservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySize {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

/// Guest contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Free-text notes; DIA stores up to three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    pub first: String,
    pub second: String,
    pub third: String,
}

impl Notes {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            first: text.into(),
            ..Self::default()
        }
    }
}

/// Input for `rst_rezervasyon_ekle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub code: String,
    pub guest: Guest,
    pub party: PartySize,
    pub status: String,
    /// Salon is referenced by name, not by key.
    pub salon_name: String,
    pub table_keys: Vec<u64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: Notes,
    /// Create one reservation slip per selected table.
    #[serde(default)]
    pub split_per_table: bool,
}

/// Input for `rst_rezervasyon_guncelle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationUpdate {
    /// Server-assigned key returned by the create call.
    pub key: u64,
    pub code: String,
    pub guest: Guest,
    pub party: PartySize,
    #[serde(default)]
    pub status: Option<String>,
    pub salon_name: String,
    pub table_keys: Vec<u64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: Notes,
    /// Customer card (`carikartkodu`) to link, if any.
    #[serde(default)]
    pub customer_card: Option<String>,
    /// Defaults to [`DEFAULT_LEVEL_CODE`].
    #[serde(default)]
    pub level_code: Option<u32>,
}

/// Parsed response envelope.
///
/// Only produced for responses whose `code` is `"200"`; everything besides
/// `code` and `msg` is operation-specific and kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    body: Value,
}

impl ApiResponse {
    pub(crate) fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn msg(&self) -> Option<&Value> {
        self.body.get("msg")
    }

    /// The `result` field carried by list and get operations.
    pub fn result(&self) -> Option<&Value> {
        self.body.get("result")
    }

    /// Server-assigned key; DIA sends it as a number or a numeric string.
    pub fn key(&self) -> Option<u64> {
        match self.body.get("key")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    pub fn as_value(&self) -> &Value {
        &self.body
    }

    pub fn into_value(self) -> Value {
        self.body
    }
}

fn empty() -> Value {
    Value::String(String::new())
}
