use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_minutes: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_minutes: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        // Expiry is checked against an injectable clock in `validate_token_at`.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            expiration_minutes,
        }
    }

    pub fn expiration_minutes(&self) -> i64 {
        self.expiration_minutes
    }

    pub fn create_token(&self, email: &str) -> AppResult<String> {
        self.create_token_at(email, Utc::now())
    }

    pub fn create_token_at(&self, email: &str, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims::new(email, issued_at, self.expiration_minutes);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_token_at(token, Utc::now())
    }

    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::InvalidToken("Token signature is invalid".to_string())
                }
                _ => AppError::InvalidToken(format!("Malformed token: {}", e)),
            })?;

        if claims.is_expired_at(now) {
            return Err(AppError::InvalidToken("Token has expired".to_string()));
        }
        if claims.sub.is_empty() {
            return Err(AppError::InvalidToken("Token has no subject".to_string()));
        }

        Ok(claims)
    }
}
