//! Secret handling.
//!
//! Directory passwords are held as [`SecretString`] so they never reach logs
//! or `Debug` output.

pub use secrecy::{ExposeSecret, SecretString};

/// Compare a stored secret with a candidate without short-circuiting on the
/// first differing byte.
pub fn secret_matches(secret: &SecretString, candidate: &str) -> bool {
    let stored = secret.expose_secret().as_bytes();
    let candidate = candidate.as_bytes();
    if stored.len() != candidate.len() {
        return false;
    }
    stored
        .iter()
        .zip(candidate)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
