use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::Value;

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::{
        request::{CreateQuestionRequest, QuestionQueryParams, UpdateQuestionRequest},
        response::QuestionResponse,
    },
};

#[post("/api/admin/questions/add")]
async fn add_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create(request.into_inner(), &admin.0)
        .await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(question)))
}

#[get("/api/admin/questions/get_all")]
async fn get_all_questions(
    state: web::Data<AppState>,
    query: web::Query<QuestionQueryParams>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .question_service
        .list(&query.into_inner().into())
        .await?;
    let response: Vec<QuestionResponse> = questions.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[put("/api/admin/questions/update/{question_id}")]
async fn update_question(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update(&question_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(QuestionResponse::from(question)))
}

#[delete("/api/admin/questions/delete/{question_id}")]
async fn delete_question(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete(&question_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body is a JSON array of question objects (a single object is also accepted).
#[post("/api/admin/questions/bulk_upload")]
async fn bulk_upload(
    state: web::Data<AppState>,
    body: web::Json<Value>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let rows = match body.into_inner() {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        _ => {
            return Err(AppError::ValidationFailed(
                "Upload must be a JSON array of questions".to_string(),
            ))
        }
    };

    let report = state.question_service.bulk_import(rows, &admin.0).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/api/admin/questions/categories")]
async fn get_categories(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let categories = state.question_service.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}
