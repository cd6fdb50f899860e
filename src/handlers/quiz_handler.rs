use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::DrawQuizParams,
};

/// Random quiz questions, answers withheld.
#[get("/api/user/questions")]
async fn draw_questions(
    state: web::Data<AppState>,
    query: web::Query<DrawQuizParams>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let questions = state
        .quiz_service
        .draw(&params.filter(), params.limit)
        .await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/api/user/categories")]
async fn get_categories(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let categories = state.question_service.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}
