use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{
    app_state::AppState,
    auth::guards::require_admin,
    errors::AppError,
    models::domain::User,
};

/// Why a request carries no resolved identity.
#[derive(Debug, Clone)]
struct AuthRejection(String);

/// Resolves `Authorization: Bearer <token>` to the live `User` record and
/// stores it in the request extensions. Requests without a usable token pass
/// through untouched; the `AuthenticatedUser`/`AdminUser` extractors reject them.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(|h| h.strip_prefix("Bearer ").map(|t| t.trim().to_string()));

            let state = req.app_data::<web::Data<AppState>>().cloned();

            match (token, state) {
                (None, _) => {
                    req.extensions_mut()
                        .insert(AuthRejection("Missing authorization header".to_string()));
                }
                (Some(None), _) => {
                    req.extensions_mut().insert(AuthRejection(
                        "Invalid authorization header format".to_string(),
                    ));
                }
                (Some(Some(_)), None) => {
                    log::error!("AppState is not registered; cannot verify bearer tokens");
                    req.extensions_mut()
                        .insert(AuthRejection("Authentication unavailable".to_string()));
                }
                (Some(Some(token)), Some(state)) => {
                    match state.auth_service.verify_token(&token).await {
                        Ok(user) => {
                            req.extensions_mut().insert(user);
                        }
                        Err(e) => {
                            log::debug!("Rejected bearer token: {}", e);
                            req.extensions_mut()
                                .insert(AuthRejection("Invalid or expired token".to_string()));
                        }
                    }
                }
            }

            service.call(req).await
        })
    }
}

fn resolved_user(req: &HttpRequest) -> Result<User, AppError> {
    let extensions = req.extensions();
    if let Some(user) = extensions.get::<User>() {
        return Ok(user.clone());
    }
    let reason = extensions
        .get::<AuthRejection>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "Not authenticated".to_string());
    Err(AppError::Unauthenticated(reason))
}

/// Any caller with a valid token.
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(resolved_user(req).map(AuthenticatedUser))
    }
}

/// A caller with a valid token whose current role is `admin`.
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = resolved_user(req).and_then(|user| {
            require_admin(&user)?;
            Ok(AdminUser(user))
        });
        ready(result)
    }
}
