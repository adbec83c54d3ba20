//! Auth-Service fuer SecurePass
//!
//! Zentraler Service fuer Registrierung, Login mit Audit-Log und
//! Token-Validierung. Die Stores werden als Arc-Handles injiziert –
//! kein prozessweiter Singleton.
//!
//! Hash und Verifikation sind CPU-gebunden und blockieren bewusst lange
//! (Argon2id mit 64 MiB Arbeitspuffer). Der Service lagert beide ueber
//! `spawn_blocking` aus dem Async-Runtime aus; die Begrenzung der
//! gleichzeitigen Hash-Operationen liegt beim HTTP-Layer.

use std::sync::Arc;

use securepass_db::{
    models::{LoginAusgang, NeuerBenutzer, NeuerLoginVersuch},
    BenutzerRecord, LoginVersuchRecord, LoginVersuchRepository, UserRepository,
};

use crate::{
    error::{AuthError, AuthResult},
    password::{passwort_hashen, passwort_verifizieren},
    token::{BearerToken, TokenStore},
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<D> {
    repo: Arc<D>,
    token_store: Arc<TokenStore>,
}

impl<D> AuthService<D>
where
    D: UserRepository + LoginVersuchRepository,
{
    /// Erstellt einen neuen AuthService
    pub fn neu(repo: Arc<D>, token_store: Arc<TokenStore>) -> Self {
        Self { repo, token_store }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Prueft ob der Benutzername bereits vergeben ist, hasht das Passwort
    /// und legt den Account an. Das Credential wird danach nie veraendert.
    pub async fn registrieren(&self, username: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        // Pruefen ob Username bereits vergeben
        if self.repo.get_by_name(username).await?.is_some() {
            return Err(AuthError::BenutzernameVergeben(username.to_string()));
        }

        let credential = hashen_blocking(username, passwort).await?;

        let benutzer = self
            .repo
            .create(NeuerBenutzer {
                username,
                credential: &credential,
            })
            .await
            .map_err(|e| {
                // Wettlauf zwischen Pruefung und INSERT: UNIQUE-Index entscheidet
                if e.ist_eindeutigkeit() {
                    AuthError::BenutzernameVergeben(username.to_string())
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            "Neuer Benutzer registriert"
        );

        Ok(benutzer)
    }

    /// Meldet einen Benutzer an und stellt einen Bearer-Token aus
    ///
    /// Jeder Versuch wird im Audit-Log protokolliert (Erfolg wie
    /// Fehlschlag), mit `quelle` als Quelladresse. Das Salt fuer die
    /// Verifikation wird immer aus dem gespeicherten kanonischen
    /// Benutzernamen abgeleitet, nie aus dem Request-Text.
    pub async fn anmelden(
        &self,
        username: &str,
        passwort: &str,
        quelle: &str,
    ) -> AuthResult<(BenutzerRecord, BearerToken)> {
        let benutzer = match self.repo.get_by_name(username).await? {
            Some(b) => b,
            None => {
                self.versuch_protokollieren(username, LoginAusgang::Fehlschlag, quelle)
                    .await;
                return Err(AuthError::UngueltigeAnmeldedaten);
            }
        };

        let korrekt = match verifizieren_blocking(
            benutzer.credential.clone(),
            benutzer.username.clone(),
            passwort.to_string(),
        )
        .await
        {
            Ok(k) => k,
            // Nicht lesbares Credential zaehlt als fehlgeschlagene
            // Anmeldung, nicht als Crash
            Err(AuthError::VerifikationFehler(grund)) => {
                tracing::warn!(username = %username, grund = %grund, "Gespeichertes Credential nicht lesbar");
                false
            }
            Err(e) => return Err(e),
        };

        if !korrekt {
            self.versuch_protokollieren(username, LoginAusgang::Fehlschlag, quelle)
                .await;
            tracing::warn!(username = %username, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        self.versuch_protokollieren(&benutzer.username, LoginAusgang::Erfolg, quelle)
            .await;

        let token = self
            .token_store
            .ausstellen(benutzer.id, &benutzer.username)
            .await?;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            "Benutzer angemeldet"
        );

        Ok((benutzer, token))
    }

    /// Prueft ob ein Benutzername bereits vergeben ist
    pub async fn benutzer_existiert(&self, username: &str) -> AuthResult<bool> {
        Ok(self.repo.get_by_name(username).await?.is_some())
    }

    /// Gibt die Login-Versuche eines Benutzernamens zurueck, neueste zuerst
    pub async fn login_versuche(
        &self,
        username: &str,
        limit: u32,
    ) -> AuthResult<Vec<LoginVersuchRecord>> {
        Ok(self.repo.liste_fuer_username(username, limit).await?)
    }

    /// Validiert einen Bearer-Token und gibt den zugehoerigen Benutzer zurueck
    pub async fn token_validieren(&self, token: &str) -> AuthResult<BenutzerRecord> {
        let eintrag = self.token_store.validieren(token).await?;

        self.repo
            .get_by_id(eintrag.user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(eintrag.user_id.to_string()))
    }

    /// Protokolliert einen abgewiesenen Login-Versuch ohne Verifikation
    ///
    /// Fuer Requests die schon an der Eingabevalidierung scheitern –
    /// auch die gehoeren ins Audit-Log.
    pub async fn fehlversuch_protokollieren(&self, username: &str, quelle: &str) {
        self.versuch_protokollieren(username, LoginAusgang::Fehlschlag, quelle)
            .await;
    }

    /// Haengt einen Login-Versuch ans Audit-Log an (fire-and-forget)
    ///
    /// Ein fehlgeschlagener Log-Eintrag bricht den Login nicht ab.
    async fn versuch_protokollieren(&self, username: &str, ausgang: LoginAusgang, quelle: &str) {
        if let Err(e) = self
            .repo
            .anhaengen(NeuerLoginVersuch {
                username,
                ausgang,
                quelle,
            })
            .await
        {
            tracing::warn!(username = %username, fehler = %e, "Login-Versuch konnte nicht protokolliert werden");
        }
    }
}

/// Fuehrt das Hashing auf dem Blocking-Pool aus
async fn hashen_blocking(username: &str, passwort: &str) -> AuthResult<String> {
    let username = username.to_string();
    let passwort = passwort.to_string();
    tokio::task::spawn_blocking(move || passwort_hashen(&username, &passwort))
        .await
        .map_err(|e| AuthError::intern(format!("Hash-Task abgebrochen: {e}")))?
}

/// Fuehrt die Verifikation auf dem Blocking-Pool aus
async fn verifizieren_blocking(
    credential: String,
    username: String,
    passwort: String,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || passwort_verifizieren(&credential, &username, &passwort))
        .await
        .map_err(|e| AuthError::intern(format!("Verifikations-Task abgebrochen: {e}")))?
}
