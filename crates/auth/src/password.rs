//! Password hashing.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::Rng;

use crate::{AuthError, AuthResult};

/// Hashes a password with Argon2id and a random salt.
///
/// The result is a PHC string that embeds the parameters and salt.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = generate_salt()?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a PHC string produced by [`hash_password`].
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordHash(e.to_string())),
    }
}

static DECOY_HASH: OnceLock<String> = OnceLock::new();

/// A hash of a random secret that no submitted password matches.
///
/// Verifying against it lets a login for an unknown account cost the same
/// as one with a wrong password. Computed on first use.
pub fn decoy_hash() -> AuthResult<&'static str> {
    if let Some(hash) = DECOY_HASH.get() {
        return Ok(hash);
    }
    let secret = generate_salt()?;
    let hash = hash_password(secret.as_str())?;
    Ok(DECOY_HASH.get_or_init(|| hash))
}

fn generate_salt() -> AuthResult<SaltString> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| AuthError::PasswordHash(e.to_string()))
}
