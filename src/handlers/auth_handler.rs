use actix_web::{get, post, web, Either, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{TokenResponse, UserResponse},
    },
};
use validator::Validate;

#[post("/api/auth/register")]
async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.auth_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Accepts JSON or an OAuth2-style password form.
#[post("/api/auth/login")]
async fn login(
    state: web::Data<AppState>,
    request: Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = match request {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    request.validate()?;

    let (token, user) = state
        .auth_service
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token, &user)))
}

#[get("/api/auth/me")]
async fn me(auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(auth.0)))
}
