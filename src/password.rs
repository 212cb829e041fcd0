use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Error, Result};

/// Hash a password with Argon2 and a fresh random salt, returning the PHC
/// string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `password` against a PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let a = hash_password("art123").unwrap();
        let b = hash_password("art123").unwrap();
        assert!(a.starts_with("$argon2"));
        assert_ne!(a, b);
        assert!(verify_password("art123", &a));
        assert!(!verify_password("chess456", &a));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("art123", "not-a-phc-string"));
    }
}
