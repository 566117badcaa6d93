//! Argon2id password hashing and verification.
//!
//! Hashes are stored in PHC string form so the salt and parameters travel
//! with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;

/// Prefix of generated temporary passwords.
pub const TEMPORARY_PASSWORD_PREFIX: &str = "RC";

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// One-time password handed to newly registered staff: `RC` plus five digits.
pub fn generate_temporary_password() -> String {
    let digits: u32 = rand::rng().random_range(10_000..100_000);
    format!("{TEMPORARY_PASSWORD_PREFIX}{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("RC12345").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("RC12345", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("right-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn temporary_password_shape() {
        for _ in 0..50 {
            let password = generate_temporary_password();
            assert_eq!(password.len(), 7);
            let (prefix, digits) = password.split_at(2);
            assert_eq!(prefix, "RC");
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(digits.as_bytes()[0], b'0');
        }
    }
}
