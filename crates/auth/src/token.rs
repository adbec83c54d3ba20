//! Bearer-Token-Ausgabe fuer SecurePass
//!
//! Nach erfolgreichem Login bekommt der Client einen opaken Bearer-Token.
//! Tokens werden im Speicher gehalten (HashMap mit TTL); ein
//! Hintergrund-Task bereinigt abgelaufene Eintraege. Der Kern inspiziert
//! Tokens nicht – er stellt sie nur aus und validiert sie.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Standard-Token-Lebensdauer: 1 Stunde
const TOKEN_TTL_SEKUNDEN: i64 = 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Ein ausgestellter Bearer-Token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerToken {
    /// Der Token-String (URL-sicheres Base64)
    pub token: String,
    /// ID des Benutzers dem dieser Token gehoert
    pub user_id: Uuid,
    /// Kanonischer Benutzername zum Zeitpunkt der Ausstellung
    pub username: String,
    /// Zeitpunkt der Ausstellung
    pub erstellt_am: DateTime<Utc>,
    /// Zeitpunkt des Ablaufs
    pub laeuft_ab_am: DateTime<Utc>,
}

impl BearerToken {
    /// Gibt `true` zurueck wenn der Token noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// In-Memory Token-Store mit TTL-Unterstuetzung
#[derive(Debug, Default)]
pub struct TokenStore {
    /// token -> BearerToken
    tokens: RwLock<HashMap<String, BearerToken>>,
}

impl TokenStore {
    /// Erstellt einen neuen leeren Token-Store
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Erstellt einen neuen Token-Store und startet den Cleanup-Task
    pub fn neu_mit_cleanup(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Tokens bereinigt");
                }
            }
        });
        store
    }

    /// Stellt einen neuen Token fuer den angegebenen Benutzer aus
    pub async fn ausstellen(&self, user_id: Uuid, username: &str) -> AuthResult<BearerToken> {
        let token = token_generieren();
        let jetzt = Utc::now();
        let eintrag = BearerToken {
            token: token.clone(),
            user_id,
            username: username.to_string(),
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + chrono::Duration::seconds(TOKEN_TTL_SEKUNDEN),
        };

        self.tokens.write().await.insert(token, eintrag.clone());
        tracing::debug!(user_id = %user_id, "Neuer Bearer-Token ausgestellt");
        Ok(eintrag)
    }

    /// Validiert einen Token-Wert und gibt den Eintrag zurueck
    ///
    /// Gibt `AuthError::TokenUngueltig` zurueck wenn der Token nicht
    /// gefunden wurde, `AuthError::TokenAbgelaufen` wenn er abgelaufen ist.
    pub async fn validieren(&self, token: &str) -> AuthResult<BearerToken> {
        let tokens = self.tokens.read().await;
        match tokens.get(token) {
            None => Err(AuthError::TokenUngueltig),
            Some(eintrag) if !eintrag.ist_gueltig() => Err(AuthError::TokenAbgelaufen),
            Some(eintrag) => Ok(eintrag.clone()),
        }
    }

    /// Entfernt alle abgelaufenen Tokens, gibt die Anzahl zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let mut tokens = self.tokens.write().await;
        let vorher = tokens.len();
        tokens.retain(|_, t| t.ist_gueltig());
        vorher - tokens.len()
    }

    /// Anzahl der aktuell gehaltenen Tokens (fuer Tests)
    pub async fn anzahl_aktive(&self) -> usize {
        self.tokens.read().await.len()
    }
}

/// Generiert einen kryptografisch zufaelligen Token-Wert
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
