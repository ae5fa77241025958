use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

/// `/books`; the caller layers `require_auth` on top.
pub fn router() -> Router<AppState> {
    handlers::book_routes()
}
