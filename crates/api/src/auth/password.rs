//! Password policy and Argon2id hashing for accounts.
//!
//! Stored hashes are PHC strings, so the parameters and salt travel with the
//! hash and can change without a migration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, SaltString};
use argon2::Argon2;
use centace_core::error::CoreError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Reject passwords a new account may not use.
pub fn check_password_policy(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        )));
    }
    if password.chars().all(char::is_whitespace) {
        return Err(CoreError::Validation("Password must not be blank".into()));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when `stored` is not a PHC
/// string this build can read.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored)?;
    match parsed.verify_password(&[&Argon2::default()], password) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hash_round_trips_and_is_salted() {
        let first = hash_password("cocoa-harvest-2026").unwrap();
        let second = hash_password("cocoa-harvest-2026").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("cocoa-harvest-2026", &first).unwrap());
        assert!(!verify_password("cocoa-harvest-2025", &first).unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-in-db").is_err());
    }

    #[test]
    fn policy_bounds() {
        assert_matches!(check_password_policy("short"), Err(CoreError::Validation(_)));
        assert!(check_password_policy("exactly8").is_ok());
        assert!(check_password_policy(&"x".repeat(MAX_PASSWORD_LEN)).is_ok());
        assert_matches!(
            check_password_policy(&"x".repeat(MAX_PASSWORD_LEN + 1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(check_password_policy("          "), Err(CoreError::Validation(_)));
        // Length counts characters, not bytes.
        assert!(check_password_policy("ñandú-ñu").is_ok());
    }
}
