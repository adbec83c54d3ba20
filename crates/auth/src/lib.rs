//! securepass-auth – Passwortschutz-Pipeline und Auth-Service
//!
//! Dieses Crate implementiert:
//! - Deterministische Salt-Ableitung und Salt/Passwort-Verschraenkung
//! - Passwort-Hashing mit Argon2id (fixe Kostenparameter)
//! - Bearer-Token-Ausgabe (in-memory mit TTL)
//! - AuthService (Registrierung, Login mit Audit-Log, Token-Validierung)

pub mod error;
pub mod password;
pub mod salt;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use salt::{salz_ableiten, verschraenken};
pub use service::AuthService;
pub use token::{BearerToken, TokenStore};
