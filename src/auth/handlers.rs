use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest, PublicUser},
        extractors::AuthUser,
        repo::User,
        services,
    },
    error::AppError,
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that sit behind `require_auth`.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn authenticated(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state.keys.issue(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Storage(e)
    })?;
    Ok(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = services::register(state.users.as_ref(), &payload.username).await?;
    Ok((StatusCode::CREATED, Json(authenticated(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = services::login(state.users.as_ref(), &payload.username)
        .await
        .map_err(|e| match e {
            // An unknown username is a bad login request, not a missing resource.
            AppError::NotFound(msg) => AppError::InvalidInput(msg),
            other => other,
        })?;
    Ok(Json(authenticated(&state, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = services::find_by_id(state.users.as_ref(), user_id).await?;
    Ok(Json(PublicUser {
        user_id: user.id,
        username: user.username,
    }))
}
