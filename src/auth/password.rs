use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use once_cell::sync::Lazy;

use crate::errors::{AppError, AppResult};

/// Hash checked when a login names no known account, so both rejection paths cost one verify.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("quizdeck-no-such-account").ok());

pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("argon2 hash_password error: {}", e);
            AppError::InternalError("Failed to hash password".to_string())
        })
}

pub fn verify_password(plain: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        log::error!("argon2 parse hash error: {}", e);
        AppError::InternalError("Stored password hash is malformed".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Spends the same Argon2 work as a real verify; the result is discarded.
pub fn verify_dummy_password(plain: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
}
