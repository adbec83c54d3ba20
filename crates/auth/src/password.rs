//! Passwort-Hashing mit Argon2id
//!
//! Hasht das verschraenkte Salt/Passwort-Material mit Argon2id und fixen
//! Kostenparametern. Die Parameter muessen exakt stimmen, damit Credentials
//! implementierungsuebergreifend kompatibel bleiben:
//! - Speicher: 65536 KiB (64 MiB)
//! - Iterationen: 5
//! - Parallelismus: 2
//!
//! Argon2 erzeugt pro Aufruf zusaetzlich ein eigenes zufaelliges internes
//! Salt, das im PHC-String mitkodiert wird. Das liegt UEBER dem
//! deterministischen Benutzernamen-Salt aus [`crate::salt`] – zwei
//! getrennte Schichten.
//!
//! Jeder Aufruf allokiert den 64-MiB-Arbeitspuffer neu und blockiert den
//! aufrufenden Thread fuer die Dauer der Berechnung (bewusst langsam).
//! Aufrufer auf dem Async-Runtime muessen das ueber `spawn_blocking`
//! auslagern, siehe [`crate::service`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};
use crate::salt::{salz_ableiten, verschraenken};

/// Fixe Argon2id-Parameter (Format-Kompatibilitaet, nicht aendern)
fn argon2_instanz() -> AuthResult<Argon2<'static>> {
    let params = Params::new(
        65536, // m_cost: 64 MiB
        5,     // t_cost: 5 Iterationen
        2,     // p_cost: 2 Lanes
        None,  // output_len: Standard (32 Bytes)
    )
    .map_err(|e| AuthError::HashingFehler(format!("Ungueltige Argon2-Parameter: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hasht ein Passwort fuer die angegebene Identitaet
///
/// Leitet das Salt aus der Identitaet ab, verschraenkt es mit dem
/// Passwort und hasht das Material mit Argon2id. Gibt den
/// selbstbeschreibenden PHC-String zurueck (inkl. Parameter und
/// internem Salt) – das gespeicherte Credential.
pub fn passwort_hashen(identitaet: &str, passwort: &str) -> AuthResult<String> {
    let salz = salz_ableiten(identitaet);
    let material = verschraenken(&salz, passwort);

    let interne_salt = SaltString::generate(&mut OsRng);
    argon2_instanz()?
        .hash_password(material.as_bytes(), &interne_salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFehler(e.to_string()))
}

/// Verifiziert ein Kandidaten-Passwort gegen ein gespeichertes Credential
///
/// `identitaet` muss der kanonische (gespeicherte) Benutzername des
/// Kontos sein, derselbe wie bei der Registrierung – sonst stimmt das
/// abgeleitete Salt nicht und die Verifikation schlaegt immer fehl.
///
/// Gibt `Ok(false)` bei falschem Passwort zurueck. Ein nicht lesbares
/// Credential (kaputtes Encoding) ist `VerifikationFehler` – Aufrufer
/// behandeln das als "nicht authentifiziert", nie als Crash.
pub fn passwort_verifizieren(
    credential: &str,
    identitaet: &str,
    passwort: &str,
) -> AuthResult<bool> {
    let geparst = PasswordHash::new(credential)
        .map_err(|e| AuthError::VerifikationFehler(format!("Ungueltiges Hash-Format: {e}")))?;

    let salz = salz_ableiten(identitaet);
    let material = verschraenken(&salz, passwort);

    match argon2_instanz()?.verify_password(material.as_bytes(), &geparst) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::VerifikationFehler(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashen_und_verifizieren() {
        let credential = passwort_hashen("alice", "hunter2").expect("Hashing fehlgeschlagen");

        assert!(
            credential.starts_with("$argon2id$"),
            "Credential muss mit $argon2id$ beginnen"
        );
        // Parameter sind im PHC-String selbstbeschreibend kodiert
        assert!(credential.contains("m=65536,t=5,p=2"));

        let korrekt = passwort_verifizieren(&credential, "alice", "hunter2")
            .expect("Verifikation fehlgeschlagen");
        assert!(korrekt, "Richtiges Passwort muss verifiziert werden");
    }

    #[test]
    fn falsches_passwort_wird_abgelehnt() {
        let credential = passwort_hashen("alice", "hunter2").unwrap();
        let korrekt = passwort_verifizieren(&credential, "alice", "hunter3").unwrap();
        assert!(!korrekt, "Falsches Passwort muss abgelehnt werden");
    }

    #[test]
    fn falsche_identitaet_wird_abgelehnt() {
        // Gleiches Passwort, anderer Benutzername -> anderes Salt -> false
        let credential = passwort_hashen("alice", "hunter2").unwrap();
        let korrekt = passwort_verifizieren(&credential, "bob", "hunter2").unwrap();
        assert!(!korrekt, "Credential darf nur zur eigenen Identitaet passen");
    }

    #[test]
    fn gleiche_eingaben_unterschiedliche_credentials() {
        // Das interne Argon2-Salt ist zufaellig pro Aufruf
        let c1 = passwort_hashen("alice", "hunter2").unwrap();
        let c2 = passwort_hashen("alice", "hunter2").unwrap();
        assert_ne!(c1, c2);

        // Beide verifizieren trotzdem
        assert!(passwort_verifizieren(&c1, "alice", "hunter2").unwrap());
        assert!(passwort_verifizieren(&c2, "alice", "hunter2").unwrap());
    }

    #[test]
    fn leeres_passwort_roundtrip() {
        let credential = passwort_hashen("alice", "").unwrap();
        assert!(passwort_verifizieren(&credential, "alice", "").unwrap());
        assert!(!passwort_verifizieren(&credential, "alice", "x").unwrap());
    }

    #[test]
    fn kaputtes_credential_gibt_verifikationfehler() {
        let ergebnis = passwort_verifizieren("kein_gueltiger_hash", "alice", "hunter2");
        assert!(matches!(ergebnis, Err(AuthError::VerifikationFehler(_))));
    }
}
