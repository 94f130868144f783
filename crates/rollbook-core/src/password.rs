//! Password hashing backed by bcrypt.

use std::sync::LazyLock;

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Hash of a password no account uses, at the same cost as real hashes.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("rollbook-no-such-account", DEFAULT_COST).ok());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` for a wrong password; errors only when the stored hash is unusable.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed).map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}

/// Spends one bcrypt verification on a throwaway hash.
///
/// Login calls this when the username is unknown so the response takes as
/// long as a wrong-password attempt.
pub fn verify_dummy_password(password: &str) {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(password, dummy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("admin123").unwrap();
        assert_ne!(hashed, "admin123");
        assert!(verify_password("admin123", &hashed).unwrap());
        assert!(!verify_password("admin124", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dummy_hash_costs_the_same_as_real_hashes() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        let real = hash_password("secret").unwrap();
        assert_eq!(&dummy[..7], &real[..7]);
        assert!(!verify("secret", dummy).unwrap());
        verify_dummy_password("secret");
    }

    #[test]
    fn test_verify_against_garbage_hash_errors() {
        assert!(verify_password("secret", "not-a-bcrypt-hash").is_err());
    }
}
