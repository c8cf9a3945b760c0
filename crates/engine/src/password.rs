//! Password hashing.
//!
//! Credentials are stored as salted Argon2 hashes in PHC string format, so
//! a leaked `users` table never exposes a plaintext password. Verification
//! re-derives the hash from the stored salt and parameters.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Internal(format!("password hashing failed: {err}")))
}

/// Check a plaintext password against a stored PHC hash string.
///
/// A stored value that is not a valid hash fails verification rather than
/// erroring, so a corrupt row behaves like a wrong password.
#[must_use]
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
