//! Password hashing with bcrypt.

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

// Real bcrypt hash with no matching stored credential. Verified against when a
// username does not exist so the response time matches a wrong-password check.
const DUMMY_HASH: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

/// Hash a password with a fresh random salt.
/// # Errors
/// Returns an error if the hash cannot be computed.
pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).context("failed to hash password")
}

/// Check a password against a stored hash.
///
/// A malformed hash is a non-match, never an error.
#[must_use]
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

/// Burn a bcrypt verification against a throwaway hash.
///
/// Called on the unknown-username path so its timing is indistinguishable
/// from a wrong password against an existing account.
pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}
