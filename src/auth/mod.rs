use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod repo;
pub mod services;

pub use claims::Claims;

/// Unauthenticated `/register` and `/login`.
pub fn public_router() -> Router<AppState> {
    handlers::auth_routes()
}

/// `/me`; the caller layers `require_auth` on top.
pub fn protected_router() -> Router<AppState> {
    handlers::me_routes()
}
