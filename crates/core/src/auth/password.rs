//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashing failed (only on internal argon2 errors).
#[derive(Debug, thiserror::Error)]
#[error("password hashing error")]
pub struct PasswordHashError;

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns [`PasswordHashError`] if argon2 rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Check `password` against a stored value.
///
/// Stored values that are not PHC hash strings predate hashing (the web
/// dashboard kept passwords verbatim) and are compared byte for byte.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => constant_time_eq(password.as_bytes(), stored.as_bytes()),
    }
}

/// Whether `stored` is already an argon2 hash.
#[must_use]
pub fn is_hashed(stored: &str) -> bool {
    PasswordHash::new(stored).is_ok()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("admin123").unwrap();
        assert!(is_hashed(&hash));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("user123").unwrap();
        let b = hash_password("user123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_plaintext_is_compared_exactly() {
        assert!(!is_hashed("user123"));
        assert!(verify_password("user123", "user123"));
        assert!(!verify_password("User123", "user123"));
        assert!(!verify_password("user12", "user123"));
    }
}
