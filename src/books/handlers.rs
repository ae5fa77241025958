use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateBookRequest, MessageResponse},
    repo::Book,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, extract::JsonBody, state::AppState};

/// Book routes; every one of them must sit behind `require_auth`.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route("/books/:id", delete(delete_book))
}

#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(services::list(state.books.as_ref(), user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn add_book(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = services::add(
        state.books.as_ref(),
        user_id,
        &body.title,
        &body.author,
        &body.cover,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // An id that cannot name a book is reported the same way as an unknown one.
    let book_id =
        Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Book not found".into()))?;
    services::remove(state.books.as_ref(), user_id, book_id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".into(),
    }))
}
