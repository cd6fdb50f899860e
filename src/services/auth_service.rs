use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    auth::{
        password::{hash_password, verify_dummy_password, verify_password},
        JwtService,
    },
    errors::{AppError, AppResult},
    models::{domain::User, dto::request::RegisterRequest},
    repositories::UserRepository,
};

pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt_service: JwtService) -> Self {
        Self {
            repository,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user = User::new(
            request.email.trim(),
            request.username.trim(),
            request.full_name,
            request.role,
            hashed_password,
        );

        // Uniqueness is enforced by the store, not by a prior lookup.
        let user = self.repository.create(user).await?;
        log::info!("Registered user '{}' with role {}", user.username, user.role.as_str());
        Ok(user)
    }

    /// `identifier` is tried as an email first, then as a username. Unknown
    /// identifiers and wrong passwords produce the same error.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<(String, User)> {
        let identifier = identifier.trim();
        let user = match self.repository.find_by_email(identifier).await? {
            Some(user) => Some(user),
            None => self.repository.find_by_username(identifier).await?,
        };

        let Some(user) = user else {
            verify_dummy_password(password);
            log::warn!("Login rejected: unknown identifier");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.hashed_password)? {
            log::warn!("Login rejected: wrong password for user id {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.jwt_service.create_token(&user.email)?;
        log::info!("User '{}' logged in", user.username);
        Ok((token, user))
    }

    pub async fn verify_token(&self, token: &str) -> AppResult<User> {
        self.verify_token_at(token, Utc::now()).await
    }

    /// Checks signature and expiry, then loads the live user so the current role applies.
    pub async fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<User> {
        let claims = self.jwt_service.validate_token_at(token, now)?;

        self.repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::InvalidToken("Token subject no longer exists".to_string()))
    }
}
