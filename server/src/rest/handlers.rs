//! REST-Handler fuer die SecurePass-API
//!
//! Alle Request-Bodies sind explizit typisierte Structs mit
//! Pflichtfeld-Validierung, bevor der Auth-Kern aufgerufen wird.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use securepass_db::LoginVersuchRecord;

use crate::rest::{
    eingabe_fehler, fehler_antwort, quelladresse, token_aus_headers, AppState,
};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// GET / – statischer Service-Banner
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": "SecurePass API laeuft." })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Registrierung
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: uuid::Uuid,
}

/// POST /v1/users – registriert einen neuen Benutzer
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    if body.username.is_empty() || body.password.is_empty() {
        return eingabe_fehler("Benutzername und Passwort sind erforderlich");
    }

    let _erlaubnis = match state.hash_schleuse.acquire().await {
        Ok(e) => e,
        Err(_) => return fehler_antwort(&securepass_auth::AuthError::intern("Schleuse geschlossen")),
    };

    match state.auth.registrieren(&body.username, &body.password).await {
        Ok(benutzer) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "Benutzer erstellt".into(),
                user_id: benutzer.id,
            }),
        )
            .into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// POST /v1/login – authentifiziert und stellt einen Bearer-Token aus
///
/// Jeder Versuch landet im Audit-Log, auch Requests mit fehlenden
/// Pflichtfeldern.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Response {
    let quelle = quelladresse(&headers, Some(peer));

    if body.username.is_empty() || body.password.is_empty() {
        state
            .auth
            .fehlversuch_protokollieren(&body.username, &quelle)
            .await;
        return eingabe_fehler("Benutzername und Passwort sind erforderlich");
    }

    let _erlaubnis = match state.hash_schleuse.acquire().await {
        Ok(e) => e,
        Err(_) => return fehler_antwort(&securepass_auth::AuthError::intern("Schleuse geschlossen")),
    };

    match state
        .auth
        .anmelden(&body.username, &body.password, &quelle)
        .await
    {
        Ok((_benutzer, token)) => (
            StatusCode::OK,
            Json(LoginResponse {
                message: "Anmeldung erfolgreich".into(),
                token: token.token,
            }),
        )
            .into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

// ---------------------------------------------------------------------------
// Benutzername-Verfuegbarkeit
// ---------------------------------------------------------------------------

/// GET /v1/users/:username/exists – prueft ob ein Benutzername vergeben ist
pub async fn username_exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    match state.auth.benutzer_existiert(&username).await {
        Ok(exists) => (StatusCode::OK, Json(json!({ "exists": exists }))).into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

// ---------------------------------------------------------------------------
// Login-Versuche (Audit-Abfrage)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AttemptsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AttemptsResponse {
    pub attempts: Vec<AttemptEintrag>,
}

#[derive(Debug, Serialize)]
pub struct AttemptEintrag {
    pub username: String,
    pub status: String,
    pub ip: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<LoginVersuchRecord> for AttemptEintrag {
    fn from(v: LoginVersuchRecord) -> Self {
        Self {
            username: v.username,
            status: v.ausgang.als_str().to_string(),
            ip: v.quelle,
            timestamp: v.zeitpunkt,
        }
    }
}

/// GET /v1/users/:username/login-attempts – Audit-Log, neueste zuerst
pub async fn login_attempts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<AttemptsQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(50).min(1000);

    match state.auth.login_versuche(&username, limit).await {
        Ok(versuche) => (
            StatusCode::OK,
            Json(AttemptsResponse {
                attempts: versuche.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(e) => fehler_antwort(&e),
    }
}

// ---------------------------------------------------------------------------
// Geschuetzte Ressource
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// GET /v1/me – Benutzerinfo hinter Bearer-Token-Pruefung
///
/// 401 ohne Token, 403 bei ungueltigem oder abgelaufenem Token.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = match token_aus_headers(&headers) {
        Some(t) => t,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Bearer-Token erforderlich" })),
            )
                .into_response();
        }
    };

    match state.auth.token_validieren(token).await {
        Ok(benutzer) => (
            StatusCode::OK,
            Json(MeResponse {
                user_id: benutzer.id,
                username: benutzer.username,
                created_at: benutzer.created_at,
            }),
        )
            .into_response(),
        Err(e) => fehler_antwort(&e),
    }
}
