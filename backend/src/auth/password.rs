//! Credential hashing.
//!
//! Passwords are hashed with bcrypt at the default cost. The salt is
//! generated per call and embedded in the output, so hashing the same
//! password twice yields different strings that both verify.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a raw password for storage.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
}

/// Checks a raw password against a stored hash.
///
/// Fails closed: a malformed stored hash verifies as `false`, never as a
/// match and never as a panic.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hashed));
    }

    #[test]
    fn wrong_password_rejected() {
        let hashed = hash_password("correct horse battery staple").unwrap();
        assert!(!verify_password("correct horse battery stable", &hashed));
        assert!(!verify_password("", &hashed));
    }

    #[test]
    fn salted_hashes_differ_but_both_verify() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("hunter2", &first));
        assert!(verify_password("hunter2", &second));
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
        assert!(!verify_password("hunter2", ""));
    }
}
