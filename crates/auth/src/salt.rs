//! Deterministische Salt-Ableitung und Salt/Passwort-Verschraenkung
//!
//! Das Salt ist kein gespeicherter Zufallswert, sondern der SHA-256-Digest
//! des Benutzernamens (lowercase Hex, 64 Zeichen). Es wird bei Hash und
//! Verifikation identisch neu berechnet. Damit ist das Salt aus dem
//! Benutzernamen oeffentlich ableitbar – eine bewusste Design-Entscheidung
//! des Formats, die fuer Kompatibilitaet beibehalten wird (siehe DESIGN.md).
//!
//! Die Verschraenkung webt das Salt in drei Teilen um die beiden
//! Passwort-Haelften, damit es kein simples Prefix/Suffix ist:
//! `teil1 + pwd_kopf + teil2 + pwd_rest + teil3`.

use sha2::{Digest, Sha256};

/// Leitet das deterministische Salt aus einer Identitaet ab
///
/// SHA-256 ueber die UTF-8-Bytes, lowercase Hex (64 Zeichen).
/// Pur und total: identischer Output fuer identischen Input,
/// keine Fehlerfaelle (auch nicht fuer den leeren String).
pub fn salz_ableiten(identitaet: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identitaet.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verschraenkt Salt und Passwort zum Hash-Material
///
/// Das Salt wird bei floor(n/3) und floor(2n/3) in drei Teile geteilt,
/// das Passwort bei floor(len/2) in zwei. Die Offsets zaehlen Zeichen
/// (nicht Bytes) und landen immer auf Zeichengrenzen, damit auch
/// Multi-Byte-Passwoerter nie zu einem Panic fuehren koennen.
///
/// Floor-Division-Semantik ist Teil des Formats: ein leeres Passwort
/// ergibt das unveraenderte Salt, ein Passwort der Laenge 1 landet
/// komplett im hinteren Teil (floor(1/2) = 0).
pub fn verschraenken(salz: &str, passwort: &str) -> String {
    let salz_laenge = salz.chars().count();
    let schnitt1 = zeichen_grenze(salz, salz_laenge / 3);
    let schnitt2 = zeichen_grenze(salz, 2 * salz_laenge / 3);
    let (teil1, rest) = salz.split_at(schnitt1);
    let (teil2, teil3) = rest.split_at(schnitt2 - schnitt1);

    let mitte = zeichen_grenze(passwort, passwort.chars().count() / 2);
    let (kopf, rest_pwd) = passwort.split_at(mitte);

    let mut material =
        String::with_capacity(salz.len() + passwort.len());
    material.push_str(teil1);
    material.push_str(kopf);
    material.push_str(teil2);
    material.push_str(rest_pwd);
    material.push_str(teil3);
    material
}

/// Byte-Offset der n-ten Zeichengrenze, geklemmt auf die Stringlaenge
fn zeichen_grenze(s: &str, zeichen: usize) -> usize {
    s.char_indices()
        .nth(zeichen)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
