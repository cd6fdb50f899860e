use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::AddBookmarkRequest,
        response::{
            BookmarkCreatedResponse, BookmarkResponse, BookmarkStatusResponse, MessageResponse,
        },
    },
};

#[post("/api/user/bookmarks/add")]
async fn add_bookmark(
    state: web::Data<AppState>,
    request: web::Json<AddBookmarkRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let bookmark = state
        .bookmark_service
        .add(&auth.0, &request.question_id)
        .await?;
    Ok(HttpResponse::Created().json(BookmarkCreatedResponse {
        id: bookmark.id,
        message: "Question bookmarked successfully".to_string(),
    }))
}

#[delete("/api/user/bookmarks/remove/{question_id}")]
async fn remove_bookmark(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .bookmark_service
        .remove(&auth.0, &question_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Bookmark removed successfully")))
}

#[get("/api/user/bookmarks")]
async fn list_bookmarks(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let bookmarks = state.bookmark_service.list(&auth.0).await?;
    let response: Vec<BookmarkResponse> = bookmarks.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/user/bookmarks/check/{question_id}")]
async fn check_bookmark(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let bookmarked = state
        .bookmark_service
        .is_bookmarked(&auth.0, &question_id)
        .await?;
    Ok(HttpResponse::Ok().json(BookmarkStatusResponse { bookmarked }))
}
