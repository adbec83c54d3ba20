//! Datenbankmodelle fuer SecurePass
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
///
/// `credential` ist der selbstbeschreibende Argon2id-PHC-String –
/// er wird nach der Registrierung nie veraendert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub username: String,
    pub credential: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub username: &'a str,
    pub credential: &'a str,
}

// ---------------------------------------------------------------------------
// Login-Versuche (Audit-Log)
// ---------------------------------------------------------------------------

/// Ausgang eines Login-Versuchs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginAusgang {
    Erfolg,
    Fehlschlag,
}

impl LoginAusgang {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Erfolg => "success",
            Self::Fehlschlag => "failure",
        }
    }
}

impl std::str::FromStr for LoginAusgang {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Erfolg),
            "failure" => Ok(Self::Fehlschlag),
            other => Err(format!("Unbekannter Login-Ausgang: {other}")),
        }
    }
}

/// Ein Eintrag im append-only Audit-Log
///
/// Eintraege werden nie mutiert oder geloescht; ihr Lebenszyklus ist
/// unabhaengig vom Benutzer-Datensatz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginVersuchRecord {
    pub id: Uuid,
    pub username: String,
    pub ausgang: LoginAusgang,
    /// Quelladresse des Versuchs (IP oder "unknown")
    pub quelle: String,
    pub zeitpunkt: DateTime<Utc>,
}

/// Daten zum Anhaengen eines neuen Login-Versuchs
#[derive(Debug, Clone)]
pub struct NeuerLoginVersuch<'a> {
    pub username: &'a str,
    pub ausgang: LoginAusgang,
    pub quelle: &'a str,
}
