//! DIA JSON wire protocol.
//!
//! Every request is a single-key object naming the remote operation:
//! `{"rst_rezervasyon_sil": {"session_id": .., "firma_kodu": .., ...}}`.
//! Every response carries a string `code`; `"200"` is the only success value.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{DiaError, Result};
use crate::types::{NewReservation, ReservationUpdate, DEFAULT_LEVEL_CODE};

/// Path of the system (`sis`) endpoint: login and logout.
pub const SIS_PATH: &str = "/sis/json";
/// Path of the restaurant (`rst`) endpoint: salons and reservations.
pub const RST_PATH: &str = "/rst/json";

pub const SUCCESS_CODE: &str = "200";
pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const NO_SESSION_RETURNED: &str = "No session_id returned";
pub const LOGIN_LANG: &str = "tr";

/// `saat` wire format; sub-second precision is dropped.
const TIME_FORMAT: &str = "%H:%M:%S";

/// Remote operations, named after their top-level request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Logout,
    ListSalons,
    GetSalon,
    AddReservation,
    UpdateReservation,
    DeleteReservation,
    ListReservations,
}

impl Operation {
    /// Request key understood by DIA.
    pub fn wire_name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Logout => "logout",
            Operation::ListSalons => "rst_salon_listele",
            Operation::GetSalon => "rst_salon_getir",
            Operation::AddReservation => "rst_rezervasyon_ekle",
            Operation::UpdateReservation => "rst_rezervasyon_guncelle",
            Operation::DeleteReservation => "rst_rezervasyon_sil",
            Operation::ListReservations => "rst_rezervasyon_listele",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Operation::Login | Operation::Logout => SIS_PATH,
            _ => RST_PATH,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Login => "login",
            Operation::Logout => "logout",
            Operation::ListSalons => "list salons",
            Operation::GetSalon => "get salon",
            Operation::AddReservation => "add reservation",
            Operation::UpdateReservation => "update reservation",
            Operation::DeleteReservation => "delete reservation",
            Operation::ListReservations => "list reservations",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub params: LoginParams<'a>,
    pub disconnect_same_user: bool,
    pub lang: &'static str,
}

#[derive(Serialize)]
pub(crate) struct LoginParams<'a> {
    pub apikey: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LogoutPayload<'a> {
    pub session_id: &'a str,
}

/// Session and tenant scoping attached to every `rst` call.
#[derive(Serialize)]
pub(crate) struct Scoped<'a, P> {
    pub session_id: &'a str,
    pub firma_kodu: u32,
    pub donem_kodu: u32,
    #[serde(flatten)]
    pub fields: P,
}

#[derive(Serialize)]
pub(crate) struct Keyed<'a, K> {
    pub key: K,
    pub params: &'a Value,
}

#[derive(Serialize)]
pub(crate) struct Card<C> {
    pub kart: C,
}

#[derive(Serialize)]
pub(crate) struct SalonRef<'a> {
    pub salonadi: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CustomerCardRef<'a> {
    pub carikartkodu: &'a str,
}

/// `kart` record of `rst_rezervasyon_ekle`.
#[derive(Serialize)]
pub(crate) struct NewReservationCard<'a> {
    kodu: &'a str,
    adsoyad: &'a str,
    eposta: &'a str,
    telefon: &'a str,
    kisisayisi: u32,
    cocuksayisi: u32,
    // Upstream spells the infant count differently on create and update.
    bebekayisi: u32,
    durum: &'a str,
    #[serde(rename = "_key_rst_salon")]
    salon: SalonRef<'a>,
    masakeys: &'a [u64],
    tarih: NaiveDate,
    #[serde(serialize_with = "wire_time")]
    saat: NaiveTime,
    not1: &'a str,
    not2: &'a str,
    not3: &'a str,
    #[serde(rename = "_key_sis_seviyekodu")]
    level_code: u32,
    #[serde(rename = "secilen_her_masa_icın_ayri_rezervasyon_fisi_olusturma")]
    split_per_table: bool,
}

impl<'a> From<&'a NewReservation> for NewReservationCard<'a> {
    fn from(r: &'a NewReservation) -> Self {
        Self {
            kodu: &r.code,
            adsoyad: &r.guest.name,
            eposta: &r.guest.email,
            telefon: &r.guest.phone,
            kisisayisi: r.party.adults,
            cocuksayisi: r.party.children,
            bebekayisi: r.party.infants,
            durum: &r.status,
            salon: SalonRef { salonadi: &r.salon_name },
            masakeys: &r.table_keys,
            tarih: r.date,
            saat: r.time,
            not1: &r.notes.first,
            not2: &r.notes.second,
            not3: &r.notes.third,
            level_code: 0,
            split_per_table: r.split_per_table,
        }
    }
}

/// `kart` record of `rst_rezervasyon_guncelle`.
#[derive(Serialize)]
pub(crate) struct ReservationUpdateCard<'a> {
    #[serde(rename = "_key")]
    key: u64,
    kodu: &'a str,
    adsoyad: &'a str,
    telefon: &'a str,
    eposta: &'a str,
    kisisayisi: u32,
    cocuksayisi: u32,
    bebeksayisi: u32,
    tarih: NaiveDate,
    #[serde(serialize_with = "wire_time")]
    saat: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    durum: Option<&'a str>,
    #[serde(rename = "_key_rst_salon")]
    salon: SalonRef<'a>,
    masakeys: &'a [u64],
    #[serde(rename = "_key_scf_carikart", skip_serializing_if = "Option::is_none")]
    customer_card: Option<CustomerCardRef<'a>>,
    #[serde(rename = "_key_sis_seviyekodu")]
    level_code: u32,
    not1: &'a str,
    not2: &'a str,
    not3: &'a str,
}

impl<'a> From<&'a ReservationUpdate> for ReservationUpdateCard<'a> {
    fn from(r: &'a ReservationUpdate) -> Self {
        Self {
            key: r.key,
            kodu: &r.code,
            adsoyad: &r.guest.name,
            telefon: &r.guest.phone,
            eposta: &r.guest.email,
            kisisayisi: r.party.adults,
            cocuksayisi: r.party.children,
            bebeksayisi: r.party.infants,
            tarih: r.date,
            saat: r.time,
            durum: r.status.as_deref(),
            salon: SalonRef { salonadi: &r.salon_name },
            masakeys: &r.table_keys,
            customer_card: r
                .customer_card
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|carikartkodu| CustomerCardRef { carikartkodu }),
            level_code: r.level_code.unwrap_or(DEFAULT_LEVEL_CODE),
            not1: &r.notes.first,
            not2: &r.notes.second,
            not3: &r.notes.third,
        }
    }
}

fn wire_time<S: Serializer>(time: &NaiveTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(TIME_FORMAT))
}

/// Serialize `{ <operation>: payload }`.
pub(crate) fn envelope<P: Serialize>(operation: Operation, payload: &P) -> Result<String> {
    let inner = serde_json::to_value(payload).map_err(|e| DiaError::Serialization(e.to_string()))?;
    let mut body = Map::with_capacity(1);
    body.insert(operation.wire_name().to_string(), inner);
    serde_json::to_string(&Value::Object(body)).map_err(|e| DiaError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A decoded response body, split into success and failure by `code`.
#[derive(Debug)]
pub(crate) enum Reply {
    Success(Value),
    Failure(Option<String>),
}

/// Decode a response body. Fails only when the body is not JSON.
pub(crate) fn decode_reply(body: &str) -> Result<Reply> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DiaError::Transport(format!("response is not valid JSON: {e}")))?;
    if value.get("code").and_then(Value::as_str) == Some(SUCCESS_CODE) {
        Ok(Reply::Success(value))
    } else {
        Ok(Reply::Failure(message_of(&value)))
    }
}

/// Human-readable `msg`: strings as-is, structured values as JSON text.
pub(crate) fn message_of(body: &Value) -> Option<String> {
    match body.get("msg")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
