//! securepass-db – Datenbank-Abstraktion
//!
//! Stellt das Repository-Pattern bereit: die Auth-Logik spricht nur gegen
//! die Traits in [`repository`], die konkrete SQLite-Implementierung lebt
//! in [`sqlite`]. Zwei Tabellen: `users` (Benutzername -> gespeichertes
//! Credential) und `login_attempts` (append-only Audit-Log).

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use models::{
    BenutzerRecord, LoginAusgang, LoginVersuchRecord, NeuerBenutzer, NeuerLoginVersuch,
};
pub use repository::{DatabaseConfig, DbResult, LoginVersuchRepository, UserRepository};
pub use sqlite::pool::SqliteDb;
