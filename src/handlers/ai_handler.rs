use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::request::{AnalyzeDifficultyRequest, GenerateQuestionsRequest, ParseDocumentRequest},
    services::ai_service::{Provenance, SavedCandidatesResponse},
};

#[post("/api/ai/generate-questions")]
async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let candidates = state
        .ai_service
        .generate_questions(
            &request.topic,
            request.count,
            request.difficulty,
            request.category.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(candidates))
}

#[post("/api/ai/generate-and-save")]
async fn generate_and_save(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let candidates = state
        .ai_service
        .generate_questions(
            &request.topic,
            request.count,
            request.difficulty,
            request.category.as_deref(),
        )
        .await?;
    let outcome = state
        .ai_service
        .save_candidates(&candidates, &admin.0, Provenance::Topic(&request.topic))
        .await?;

    Ok(HttpResponse::Ok().json(SavedCandidatesResponse::new(
        candidates,
        outcome,
        "generated and saved",
    )))
}

#[post("/api/ai/analyze-difficulty")]
async fn analyze_difficulty(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeDifficultyRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let analysis = state
        .ai_service
        .analyze_difficulty(&request.question, &request.options)
        .await?;
    Ok(HttpResponse::Ok().json(analysis))
}

#[post("/api/ai/parse-document")]
async fn parse_document(
    state: web::Data<AppState>,
    request: web::Json<ParseDocumentRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let candidates = state
        .ai_service
        .parse_document(&request.document_text, request.max_questions)
        .await?;
    Ok(HttpResponse::Ok().json(candidates))
}

#[post("/api/ai/parse-and-save")]
async fn parse_and_save(
    state: web::Data<AppState>,
    request: web::Json<ParseDocumentRequest>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let candidates = state
        .ai_service
        .parse_document(&request.document_text, request.max_questions)
        .await?;
    let outcome = state
        .ai_service
        .save_candidates(&candidates, &admin.0, Provenance::DocumentUpload)
        .await?;

    Ok(HttpResponse::Ok().json(SavedCandidatesResponse::new(
        candidates,
        outcome,
        "parsed and saved",
    )))
}

#[get("/api/ai/health")]
async fn ai_health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.ai_service.health())
}
