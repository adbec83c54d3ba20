//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Auth-Logik von der konkreten
//! Datenbank-Implementierung. Die Stores werden als explizit konstruierte
//! Abhaengigkeiten injiziert – es gibt keinen prozessweiten Singleton.

use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerRecord, LoginVersuchRecord, NeuerBenutzer, NeuerLoginVersuch};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://securepass.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://securepass.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
///
/// Bestehende Credentials werden nie in-place veraendert – es gibt
/// bewusst keine Update-Operation fuer `credential`.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    ///
    /// Gibt `DbError::Eindeutigkeit` zurueck wenn der Benutzername
    /// bereits vergeben ist.
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seines Namens laden
    async fn get_by_name(&self, username: &str) -> DbResult<Option<BenutzerRecord>>;
}

/// Repository fuer das append-only Audit-Log der Login-Versuche
#[allow(async_fn_in_trait)]
pub trait LoginVersuchRepository: Send + Sync {
    /// Einen Login-Versuch anhaengen
    async fn anhaengen(&self, data: NeuerLoginVersuch<'_>) -> DbResult<LoginVersuchRecord>;

    /// Alle Versuche eines Benutzernamens laden, neueste zuerst
    async fn liste_fuer_username(
        &self,
        username: &str,
        limit: u32,
    ) -> DbResult<Vec<LoginVersuchRecord>>;
}
