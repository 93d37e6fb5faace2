//! In-memory stand-in for the DIA web service.
//!
//! Serves `/sis/json` (login, logout) and `/rst/json` (salons,
//! reservations). Like the real service it dispatches on the single
//! top-level key of the request body and always answers HTTP 200 with a
//! `{code, msg, ...}` envelope; `code == "200"` means success.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEMO_USERNAME: &str = "ws";
pub const DEMO_PASSWORD: &str = "ws";
pub const DEMO_API_KEY: &str = "demo-api-key";

/// Salons seeded into every fresh server.
pub const SALONS: &[(u64, &str)] = &[(1, "BAHCE"), (2, "TERAS"), (3, "SALON")];

/// First key handed out to a created reservation.
pub const FIRST_RESERVATION_KEY: u64 = 3355;

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub api_key: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
            api_key: DEMO_API_KEY.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Upstream {
    credentials: Credentials,
    sessions: HashSet<String>,
    salons: Vec<Value>,
    reservations: BTreeMap<u64, Value>,
    next_key: u64,
}

impl Upstream {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            sessions: HashSet::new(),
            salons: SALONS
                .iter()
                .map(|(key, name)| json!({"_key": key, "salonadi": name}))
                .collect(),
            reservations: BTreeMap::new(),
            next_key: FIRST_RESERVATION_KEY,
        }
    }

    fn login(&mut self, args: &Value) -> Value {
        let c = &self.credentials;
        let valid = args["username"].as_str() == Some(c.username.as_str())
            && args["password"].as_str() == Some(c.password.as_str())
            && args["params"]["apikey"].as_str() == Some(c.api_key.as_str());
        if !valid {
            return failure("401", "Kullanıcı adı, şifre veya API anahtarı hatalı");
        }
        let session_id = Uuid::new_v4().simple().to_string();
        self.sessions.insert(session_id.clone());
        json!({"code": "200", "msg": session_id})
    }

    fn logout(&mut self, args: &Value) -> Value {
        match args["session_id"].as_str() {
            Some(id) if self.sessions.remove(id) => json!({"code": "200", "msg": ""}),
            _ => failure("401", "Invalid session"),
        }
    }

    fn authorize(&self, args: &Value) -> Result<(), Value> {
        match args["session_id"].as_str() {
            Some(id) if self.sessions.contains(id) => {}
            _ => return Err(failure("401", "Invalid session")),
        }
        if !args["firma_kodu"].is_u64() || !args["donem_kodu"].is_u64() {
            return Err(failure("400", "firma_kodu and donem_kodu are required"));
        }
        Ok(())
    }

    fn find_salon(&self, name: &str) -> Option<&Value> {
        self.salons.iter().find(|s| s["salonadi"] == name)
    }

    fn get_salon(&self, args: &Value) -> Value {
        let Some(key) = args["key"].as_u64() else {
            return failure("400", "key must be a number");
        };
        match self.salons.iter().find(|s| s["_key"] == key) {
            Some(salon) => json!({"code": "200", "msg": "", "result": salon}),
            None => failure("404", &format!("Salon {key} not found")),
        }
    }

    fn add_reservation(&mut self, args: &Value) -> Value {
        let mut kart = match validate_kart(args) {
            Ok(kart) => kart,
            Err(resp) => return resp,
        };
        let salon_name = salon_name_of(&kart);
        if self.find_salon(salon_name).is_none() {
            return failure("400", &format!("Salon bulunamadı: {salon_name}"));
        }
        let key = self.next_key;
        self.next_key += 1;
        kart.insert("_key".to_string(), json!(key));
        self.reservations.insert(key, Value::Object(kart));
        json!({"code": "200", "msg": "", "key": key.to_string()})
    }

    fn update_reservation(&mut self, args: &Value) -> Value {
        let kart = match validate_kart(args) {
            Ok(kart) => kart,
            Err(resp) => return resp,
        };
        let Some(key) = kart.get("_key").and_then(Value::as_u64) else {
            return failure("400", "kart._key is required");
        };
        let salon_name = salon_name_of(&kart);
        if self.find_salon(salon_name).is_none() {
            return failure("400", &format!("Salon bulunamadı: {salon_name}"));
        }
        match self.reservations.get_mut(&key) {
            Some(Value::Object(existing)) => {
                existing.extend(kart);
                json!({"code": "200", "msg": ""})
            }
            _ => failure("404", &format!("Reservation {key} not found")),
        }
    }

    fn delete_reservation(&mut self, args: &Value) -> Value {
        let Some(raw) = args["key"].as_str() else {
            return failure("400", "key must be a string");
        };
        let removed = raw
            .parse::<u64>()
            .ok()
            .and_then(|key| self.reservations.remove(&key));
        match removed {
            Some(_) => json!({"code": "200", "msg": ""}),
            None => failure("404", &format!("Reservation {raw} not found")),
        }
    }
}

pub type Db = Arc<RwLock<Upstream>>;

pub fn app() -> Router {
    app_with(Credentials::default())
}

pub fn app_with(credentials: Credentials) -> Router {
    let db: Db = Arc::new(RwLock::new(Upstream::new(credentials)));
    Router::new()
        .route("/sis/json", post(sis))
        .route("/rst/json", post(rst))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn sis(State(db): State<Db>, body: Bytes) -> Json<Value> {
    let Some((operation, args)) = parse_request(&body) else {
        return Json(failure("400", "malformed request"));
    };
    tracing::debug!(%operation, "sis request");
    let mut upstream = db.write().await;
    Json(match operation.as_str() {
        "login" => upstream.login(&args),
        "logout" => upstream.logout(&args),
        other => failure("404", &format!("unknown operation {other}")),
    })
}

async fn rst(State(db): State<Db>, body: Bytes) -> Json<Value> {
    let Some((operation, args)) = parse_request(&body) else {
        return Json(failure("400", "malformed request"));
    };
    tracing::debug!(%operation, "rst request");
    let mut upstream = db.write().await;
    if let Err(resp) = upstream.authorize(&args) {
        return Json(resp);
    }
    Json(match operation.as_str() {
        "rst_salon_listele" => list(&upstream.salons, &args),
        "rst_salon_getir" => upstream.get_salon(&args),
        "rst_rezervasyon_ekle" => upstream.add_reservation(&args),
        "rst_rezervasyon_guncelle" => upstream.update_reservation(&args),
        "rst_rezervasyon_sil" => upstream.delete_reservation(&args),
        "rst_rezervasyon_listele" => {
            let all: Vec<Value> = upstream.reservations.values().cloned().collect();
            list(&all, &args)
        }
        other => failure("404", &format!("unknown operation {other}")),
    })
}

/// Decode a raw body; `None` when it is not a single-operation JSON object.
pub fn parse_request(body: &[u8]) -> Option<(String, Value)> {
    serde_json::from_slice(body).ok().and_then(split_operation)
}

/// Split `{ "<operation>": { ... } }` into its name and arguments.
pub fn split_operation(body: Value) -> Option<(String, Value)> {
    match body {
        Value::Object(map) if map.len() == 1 => map.into_iter().next(),
        _ => None,
    }
}

fn list(rows: &[Value], args: &Value) -> Value {
    let limit = args["limit"].as_u64().unwrap_or(10) as usize;
    let offset = args["offset"].as_u64().unwrap_or(0) as usize;
    let page: Vec<Value> = rows.iter().skip(offset).take(limit).cloned().collect();
    json!({"code": "200", "msg": "", "result": page})
}

fn validate_kart(args: &Value) -> Result<Map<String, Value>, Value> {
    let Some(kart) = args["kart"].as_object() else {
        return Err(failure("400", "kart is required"));
    };
    if !kart.get("masakeys").is_some_and(Value::is_array) {
        return Err(failure("400", "masakeys must be a list"));
    }
    Ok(kart.clone())
}

fn salon_name_of(kart: &Map<String, Value>) -> &str {
    kart.get("_key_rst_salon")
        .and_then(|salon| salon.get("salonadi"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn failure(code: &str, msg: &str) -> Value {
    json!({"code": code, "msg": msg})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_operation_accepts_single_key() {
        let (op, args) = split_operation(json!({"logout": {"session_id": "s"}})).unwrap();
        assert_eq!(op, "logout");
        assert_eq!(args["session_id"], "s");
    }

    #[test]
    fn split_operation_rejects_other_shapes() {
        assert!(split_operation(json!({})).is_none());
        assert!(split_operation(json!({"a": {}, "b": {}})).is_none());
        assert!(split_operation(json!([{"login": {}}])).is_none());
    }

    #[test]
    fn parse_request_rejects_non_json() {
        assert!(parse_request(b"not json").is_none());
        assert!(parse_request(b"").is_none());
        let (op, _) = parse_request(br#"{"login": {}}"#).unwrap();
        assert_eq!(op, "login");
    }

    #[test]
    fn list_paginates() {
        let rows: Vec<Value> = (0..5).map(|i| json!(i)).collect();
        let page = list(&rows, &json!({"limit": 2, "offset": 3}));
        assert_eq!(page["result"], json!([3, 4]));
    }

    #[test]
    fn list_defaults_to_ten_rows() {
        let rows: Vec<Value> = (0..15).map(|i| json!(i)).collect();
        let page = list(&rows, &json!({}));
        assert_eq!(page["result"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn login_rejects_wrong_api_key() {
        let mut up = Upstream::new(Credentials::default());
        let resp = up.login(&json!({
            "username": DEMO_USERNAME,
            "password": DEMO_PASSWORD,
            "params": {"apikey": "nope"}
        }));
        assert_eq!(resp["code"], "401");
        assert!(up.sessions.is_empty());
    }

    #[test]
    fn delete_requires_string_key() {
        let mut up = Upstream::new(Credentials::default());
        let resp = up.delete_reservation(&json!({"key": 3355}));
        assert_eq!(resp["code"], "400");
    }
}
