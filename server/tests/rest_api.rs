//! Integrationstests fuer die REST-API
//!
//! Fahren den kompletten Stack gegen eine In-Memory-SQLite-Datenbank:
//! Router -> AuthService -> Passwortschutz-Pipeline -> Repositories.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tower::ServiceExt;

use securepass_auth::{AuthService, TokenStore};
use securepass_db::SqliteDb;
use securepass_server::rest::{routes, AppState};

async fn test_app() -> Router {
    let db = SqliteDb::in_memory().await.expect("In-Memory-DB");
    let auth = Arc::new(AuthService::neu(Arc::new(db), TokenStore::neu()));
    let state = AppState {
        auth,
        hash_schleuse: Arc::new(Semaphore::new(2)),
    };
    routes::router(&[])
        .with_state(state)
        .layer(MockConnectInfo(SocketAddr::from(([192, 0, 2, 1], 50000))))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check() {
    let app = test_app().await;
    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn registrierung_login_und_geschuetzte_ressource() {
    let app = test_app().await;

    // Registrieren
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "alice", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["user_id"].is_string());

    // Benutzername ist jetzt vergeben
    let response = app
        .clone()
        .oneshot(get_request("/v1/users/alice/exists"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["exists"], json!(true));

    // Login mit richtigem Passwort
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/login",
            json!({ "username": "alice", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("Token im Body").to_string();

    // Geschuetzte Ressource mit Token
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], json!("alice"));

    // Audit-Log enthaelt den erfolgreichen Versuch
    let response = app
        .clone()
        .oneshot(get_request("/v1/users/alice/login-attempts"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let attempts = body["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0]["status"], json!("success"));
}

#[tokio::test]
async fn falsches_passwort_gibt_401_und_audit_eintrag() {
    let app = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "bob", "password": "geheim" }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/login",
            json!({ "username": "bob", "password": "falsch" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/v1/users/bob/login-attempts"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["attempts"][0]["status"], json!("failure"));
}

#[tokio::test]
async fn audit_log_nutzt_peer_adresse_ohne_proxy_header() {
    let app = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "dave", "password": "pw" }),
        ))
        .await
        .unwrap();

    // Login ohne x-forwarded-for: die TCP-Peer-Adresse landet im Log
    app.clone()
        .oneshot(json_request(
            "POST",
            "/v1/login",
            json!({ "username": "dave", "password": "pw" }),
        ))
        .await
        .unwrap();

    // Login hinter Proxy: der Header gewinnt
    let mut req = json_request(
        "POST",
        "/v1/login",
        json!({ "username": "dave", "password": "pw" }),
    );
    req.headers_mut()
        .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
    app.clone().oneshot(req).await.unwrap();

    let response = app
        .oneshot(get_request("/v1/users/dave/login-attempts"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let attempts = body["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    let ips: Vec<&str> = attempts.iter().map(|a| a["ip"].as_str().unwrap()).collect();
    assert!(ips.contains(&"192.0.2.1"));
    assert!(ips.contains(&"203.0.113.7"));
}

#[tokio::test]
async fn unbekannter_benutzer_gibt_401() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/login",
            json!({ "username": "niemand", "password": "egal" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn leere_pflichtfelder_geben_400_und_audit_eintrag() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/login",
            json!({ "username": "alice", "password": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Auch der Validierungs-Fehlschlag wurde protokolliert
    let response = app
        .clone()
        .oneshot(get_request("/v1/users/alice/login-attempts"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["attempts"][0]["status"], json!("failure"));

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn doppelte_registrierung_gibt_400() {
    let app = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "carol", "password": "pw1" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/users",
            json!({ "username": "carol", "password": "pw2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn geschuetzte_ressource_ohne_token() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/v1/me"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/me")
                .header(header::AUTHORIZATION, "Bearer erfundener_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
