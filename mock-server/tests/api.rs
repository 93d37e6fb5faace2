use axum::http::{self, Request, StatusCode};
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, DEMO_API_KEY, DEMO_PASSWORD, DEMO_USERNAME, FIRST_RESERVATION_KEY};
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: &Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json;charset=UTF-8")
        .body(body.to_string())
        .unwrap()
}

fn login_body() -> Value {
    json!({"login": {
        "username": DEMO_USERNAME,
        "password": DEMO_PASSWORD,
        "params": {"apikey": DEMO_API_KEY},
        "disconnect_same_user": true,
        "lang": "tr"
    }})
}

async fn call(app: &mut RouterIntoService<String>, uri: &str, body: Value) -> Value {
    let resp = ServiceExt::ready(app)
        .await
        .unwrap()
        .call(json_request(uri, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

fn scoped(operation: &str, session: &str, fields: Value) -> Value {
    let mut args = json!({"session_id": session, "firma_kodu": 4, "donem_kodu": 1});
    if let (Some(args), Value::Object(fields)) = (args.as_object_mut(), fields) {
        args.extend(fields);
    }
    json!({ operation: args })
}

// --- sis ---

#[tokio::test]
async fn login_returns_session_in_msg() {
    let resp = app().oneshot(json_request("/sis/json", &login_body())).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "200");
    assert!(!body["msg"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_with_bad_password_is_rejected() {
    let mut body = login_body();
    body["login"]["password"] = json!("wrong");
    let resp = app().oneshot(json_request("/sis/json", &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "401");
}

#[tokio::test]
async fn multi_key_body_is_malformed() {
    let resp = app()
        .oneshot(json_request("/sis/json", &json!({"login": {}, "logout": {}})))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["code"], "400");
}

#[tokio::test]
async fn non_json_body_gets_malformed_envelope() {
    for uri in ["/sis/json", "/rst/json"] {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body("not json".to_string())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "400", "{uri}");
        assert_eq!(body["msg"], "malformed request", "{uri}");
    }
}

// --- rst ---

#[tokio::test]
async fn rst_without_session_is_rejected() {
    let resp = app()
        .oneshot(json_request(
            "/rst/json",
            &scoped("rst_salon_listele", "unknown", json!({})),
        ))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["code"], "401");
    assert_eq!(body["msg"], "Invalid session");
}

// --- full lifecycle ---

#[tokio::test]
async fn reservation_lifecycle() {
    let mut app = app().into_service();

    let login = call(&mut app, "/sis/json", login_body()).await;
    let session = login["msg"].as_str().unwrap().to_string();

    // salons
    let salons = call(
        &mut app,
        "/rst/json",
        scoped("rst_salon_listele", &session, json!({"limit": 10, "offset": 0})),
    )
    .await;
    assert_eq!(salons["code"], "200");
    assert_eq!(salons["result"][0]["salonadi"], "BAHCE");

    let salon = call(
        &mut app,
        "/rst/json",
        scoped("rst_salon_getir", &session, json!({"key": 2, "params": ""})),
    )
    .await;
    assert_eq!(salon["result"]["salonadi"], "TERAS");

    // create
    let kart = json!({
        "kodu": "WS1",
        "adsoyad": "DENEME",
        "kisisayisi": 2,
        "bebekayisi": 0,
        "_key_rst_salon": {"salonadi": "BAHCE"},
        "masakeys": [2527],
        "tarih": "2025-10-21",
        "saat": "12:00:00"
    });
    let created = call(
        &mut app,
        "/rst/json",
        scoped("rst_rezervasyon_ekle", &session, json!({"kart": kart})),
    )
    .await;
    assert_eq!(created["code"], "200");
    assert_eq!(created["key"], FIRST_RESERVATION_KEY.to_string());

    // update
    let updated = call(
        &mut app,
        "/rst/json",
        scoped(
            "rst_rezervasyon_guncelle",
            &session,
            json!({"kart": {
                "_key": FIRST_RESERVATION_KEY,
                "adsoyad": "DENEME GÜNCEL",
                "_key_rst_salon": {"salonadi": "BAHCE"},
                "masakeys": [2527]
            }}),
        ),
    )
    .await;
    assert_eq!(updated["code"], "200");

    let listed = call(
        &mut app,
        "/rst/json",
        scoped("rst_rezervasyon_listele", &session, json!({"limit": 5, "offset": 0})),
    )
    .await;
    assert_eq!(listed["result"][0]["adsoyad"], "DENEME GÜNCEL");
    assert_eq!(listed["result"][0]["kodu"], "WS1");

    // delete with numeric key is refused
    let refused = call(
        &mut app,
        "/rst/json",
        scoped("rst_rezervasyon_sil", &session, json!({"key": FIRST_RESERVATION_KEY})),
    )
    .await;
    assert_eq!(refused["code"], "400");

    let deleted = call(
        &mut app,
        "/rst/json",
        scoped(
            "rst_rezervasyon_sil",
            &session,
            json!({"key": FIRST_RESERVATION_KEY.to_string(), "params": ""}),
        ),
    )
    .await;
    assert_eq!(deleted["code"], "200");

    let again = call(
        &mut app,
        "/rst/json",
        scoped(
            "rst_rezervasyon_sil",
            &session,
            json!({"key": FIRST_RESERVATION_KEY.to_string(), "params": ""}),
        ),
    )
    .await;
    assert_eq!(again["code"], "404");

    // logout
    let logout = call(&mut app, "/sis/json", json!({"logout": {"session_id": session}})).await;
    assert_eq!(logout["code"], "200");

    let after = call(
        &mut app,
        "/rst/json",
        scoped("rst_rezervasyon_listele", &session, json!({})),
    )
    .await;
    assert_eq!(after["code"], "401");
}
