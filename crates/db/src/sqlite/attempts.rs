//! SQLite-Implementierung des LoginVersuchRepository
//!
//! Das Audit-Log ist append-only: es gibt hier (und nirgendwo sonst)
//! UPDATE- oder DELETE-Pfade auf `login_attempts`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{LoginAusgang, LoginVersuchRecord, NeuerLoginVersuch};
use crate::repository::{DbResult, LoginVersuchRepository};
use crate::sqlite::pool::SqliteDb;

impl LoginVersuchRepository for SqliteDb {
    async fn anhaengen(&self, data: NeuerLoginVersuch<'_>) -> DbResult<LoginVersuchRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO login_attempts (id, username, ausgang, quelle, zeitpunkt)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.username)
        .bind(data.ausgang.als_str())
        .bind(data.quelle)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(LoginVersuchRecord {
            id,
            username: data.username.to_string(),
            ausgang: data.ausgang,
            quelle: data.quelle.to_string(),
            zeitpunkt: now,
        })
    }

    async fn liste_fuer_username(
        &self,
        username: &str,
        limit: u32,
    ) -> DbResult<Vec<LoginVersuchRecord>> {
        let rows = sqlx::query(
            "SELECT id, username, ausgang, quelle, zeitpunkt
             FROM login_attempts
             WHERE username = ?
             ORDER BY zeitpunkt DESC
             LIMIT ?",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_versuch).collect()
    }
}

/// Wandelt eine SQLite-Row in einen LoginVersuchRecord um
fn row_to_versuch(row: &sqlx::sqlite::SqliteRow) -> DbResult<LoginVersuchRecord> {
    let id_str: String = row.try_get("id")?;
    let ausgang_str: String = row.try_get("ausgang")?;
    let zeitpunkt_str: String = row.try_get("zeitpunkt")?;

    Ok(LoginVersuchRecord {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| DbError::UngueltigeDaten(format!("Ungueltige Versuchs-ID: {e}")))?,
        username: row.try_get("username")?,
        ausgang: LoginAusgang::from_str(&ausgang_str).map_err(DbError::UngueltigeDaten)?,
        quelle: row.try_get("quelle")?,
        zeitpunkt: DateTime::parse_from_rfc3339(&zeitpunkt_str)
            .map_err(|e| DbError::UngueltigeDaten(format!("Ungueltiger Zeitstempel: {e}")))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versuch_anhaengen_und_listen() {
        let db = SqliteDb::in_memory().await.expect("In-Memory-DB");

        db.anhaengen(NeuerLoginVersuch {
            username: "alice",
            ausgang: LoginAusgang::Fehlschlag,
            quelle: "203.0.113.7",
        })
        .await
        .unwrap();

        db.anhaengen(NeuerLoginVersuch {
            username: "alice",
            ausgang: LoginAusgang::Erfolg,
            quelle: "203.0.113.7",
        })
        .await
        .unwrap();

        // Versuch eines anderen Benutzers taucht nicht in alices Liste auf
        db.anhaengen(NeuerLoginVersuch {
            username: "bob",
            ausgang: LoginAusgang::Erfolg,
            quelle: "198.51.100.1",
        })
        .await
        .unwrap();

        let liste = db.liste_fuer_username("alice", 50).await.unwrap();
        assert_eq!(liste.len(), 2);
        assert!(liste.iter().all(|v| v.username == "alice"));
        // Neueste zuerst
        assert!(liste[0].zeitpunkt >= liste[1].zeitpunkt);
    }

    #[tokio::test]
    async fn limit_wird_angewendet() {
        let db = SqliteDb::in_memory().await.unwrap();

        for _ in 0..5 {
            db.anhaengen(NeuerLoginVersuch {
                username: "carol",
                ausgang: LoginAusgang::Fehlschlag,
                quelle: "unknown",
            })
            .await
            .unwrap();
        }

        let liste = db.liste_fuer_username("carol", 3).await.unwrap();
        assert_eq!(liste.len(), 3);
    }

    #[tokio::test]
    async fn leere_liste_fuer_unbekannten_benutzer() {
        let db = SqliteDb::in_memory().await.unwrap();
        let liste = db.liste_fuer_username("niemand", 10).await.unwrap();
        assert!(liste.is_empty());
    }
}
