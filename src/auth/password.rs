// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing (bcrypt).

use super::AuthError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}

/// Check a password against a stored hash.
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored credential hash could not be parsed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_original_password_only() {
        let hash = hash_password("p@ss", TEST_COST).unwrap();
        assert!(verify_password("p@ss", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn hash_is_salted() {
        let first = hash_password("secret", TEST_COST).unwrap();
        let second = hash_password("secret", TEST_COST).unwrap();
        assert_ne!(first, second);
        assert!(!first.contains("secret"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("secret", "not-a-bcrypt-hash"));
        assert!(!verify_password("", ""));
    }
}
