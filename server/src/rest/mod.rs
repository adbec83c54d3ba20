//! REST-Interface fuer SecurePass

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tokio::sync::Semaphore;

use securepass_auth::{AuthError, AuthService};
use securepass_db::SqliteDb;

/// Gemeinsamer Zustand aller REST-Handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<SqliteDb>>,
    /// Admission-Control fuer Hash-/Verifikationsoperationen: jede
    /// allokiert 64 MiB, die Schleuse deckelt den Speicherverbrauch.
    pub hash_schleuse: Arc<Semaphore>,
}

/// Bildet einen AuthError auf HTTP-Status und JSON-Fehlerkoerper ab
///
/// Interne Fehler (Hashing, Datenbank) geben keine Details nach aussen.
pub fn fehler_antwort(fehler: &AuthError) -> Response {
    let (status, meldung) = match fehler {
        AuthError::UngueltigeAnmeldedaten | AuthError::VerifikationFehler(_) => {
            (StatusCode::UNAUTHORIZED, "Benutzername oder Passwort falsch".to_string())
        }
        AuthError::TokenUngueltig | AuthError::TokenAbgelaufen => {
            (StatusCode::FORBIDDEN, fehler.to_string())
        }
        AuthError::BenutzernameVergeben(_) => (StatusCode::BAD_REQUEST, fehler.to_string()),
        AuthError::BenutzerNichtGefunden(_) => (StatusCode::NOT_FOUND, fehler.to_string()),
        AuthError::HashingFehler(_) | AuthError::Datenbank(_) | AuthError::Intern(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Interner Serverfehler".to_string(),
        ),
    };

    (status, Json(json!({ "error": meldung }))).into_response()
}

/// Antwort fuer fehlende Pflichtfelder im Request-Body
pub fn eingabe_fehler(meldung: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": meldung }))).into_response()
}

/// Extrahiert den Bearer-Token aus dem Authorization-Header
///
/// Gibt `None` zurueck wenn der Header fehlt oder kein Bearer-Schema hat.
pub fn token_aus_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Ermittelt die Quelladresse eines Requests
///
/// Bevorzugt `x-forwarded-for` (erster Eintrag, hinter Proxies), faellt
/// auf die Peer-Adresse der TCP-Verbindung und zuletzt auf "unknown"
/// zurueck. Wird nur fuer das Audit-Log verwendet.
pub fn quelladresse(headers: &HeaderMap, peer: Option<std::net::SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn token_extraktion() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(token_aus_headers(&headers), Some("abc123"));
    }

    #[test]
    fn token_fehlt_oder_falsches_schema() {
        let headers = HeaderMap::new();
        assert_eq!(token_aus_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(token_aus_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(token_aus_headers(&headers), None);
    }

    #[test]
    fn quelladresse_aus_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );
        // Der Header gewinnt auch wenn eine Peer-Adresse vorliegt
        let peer = Some("192.0.2.1:50000".parse().unwrap());
        assert_eq!(quelladresse(&headers, peer), "203.0.113.7");
    }

    #[test]
    fn quelladresse_faellt_auf_peer_adresse_zurueck() {
        let headers = HeaderMap::new();
        let peer = Some("192.0.2.1:50000".parse().unwrap());
        assert_eq!(quelladresse(&headers, peer), "192.0.2.1");
    }

    #[test]
    fn quelladresse_fallback_ohne_peer() {
        let headers = HeaderMap::new();
        assert_eq!(quelladresse(&headers, None), "unknown");
    }
}
