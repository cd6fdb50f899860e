pub mod ai_handler;
pub mod auth_handler;
pub mod bookmark_handler;
pub mod health_handler;
pub mod question_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

/// Registers every route plus JSON/query extractor configs that report
/// malformed input as `ValidationFailed`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationFailed(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationFailed(err.to_string()).into()),
    )
    .service(health_handler::root)
    .service(health_handler::health_check)
    .service(health_handler::health_check_ready)
    .service(auth_handler::register)
    .service(auth_handler::login)
    .service(auth_handler::me)
    .service(question_handler::add_question)
    .service(question_handler::get_all_questions)
    .service(question_handler::update_question)
    .service(question_handler::delete_question)
    .service(question_handler::bulk_upload)
    .service(question_handler::get_categories)
    .service(quiz_handler::draw_questions)
    .service(quiz_handler::get_categories)
    .service(bookmark_handler::add_bookmark)
    .service(bookmark_handler::remove_bookmark)
    .service(bookmark_handler::list_bookmarks)
    .service(bookmark_handler::check_bookmark)
    .service(ai_handler::generate_questions)
    .service(ai_handler::generate_and_save)
    .service(ai_handler::analyze_difficulty)
    .service(ai_handler::parse_document)
    .service(ai_handler::parse_and_save)
    .service(ai_handler::ai_health);
}
