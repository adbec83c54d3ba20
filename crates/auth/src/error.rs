//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
///
/// Fehlermeldungen enthalten nie Passwoerter, Salts oder verschraenktes
/// Material – nur strukturelle Informationen.
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwortschutz-Pipeline ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    HashingFehler(String),

    #[error("Gespeichertes Credential nicht lesbar: {0}")]
    VerifikationFehler(String),

    // --- Authentifizierung ---
    #[error("Benutzername oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    // --- Token ---
    #[error("Bearer-Token ungueltig")]
    TokenUngueltig,

    #[error("Bearer-Token abgelaufen")]
    TokenAbgelaufen,

    // --- Benutzerverwaltung ---
    #[error("Benutzername bereits vergeben: {0}")]
    BenutzernameVergeben(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] securepass_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
