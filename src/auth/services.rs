use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo::{User, UserStore};
use crate::error::{AppError, StoreError};

pub(crate) const INVALID_USERNAME: &str = "Username is required and cannot contain spaces";

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^\S+$").expect("static regex");
    }
    USERNAME_RE.is_match(username)
}

/// Trim and validate a raw username.
pub fn normalize_username(raw: &str) -> Result<&str, AppError> {
    let username = raw.trim();
    if !is_valid_username(username) {
        warn!(username = %username, "invalid username");
        return Err(AppError::InvalidInput(INVALID_USERNAME.into()));
    }
    Ok(username)
}

pub async fn register(users: &dyn UserStore, raw: &str) -> Result<User, AppError> {
    let username = normalize_username(raw)?;

    // Early, friendlier answer; the unique key below is what actually decides.
    if users.find_by_username(username).await?.is_some() {
        warn!(username = %username, "username already registered");
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let user = users.create(username).await.map_err(|e| match e {
        StoreError::Duplicate => AppError::Conflict("Username already exists".into()),
        other => other.into(),
    })?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn login(users: &dyn UserStore, raw: &str) -> Result<User, AppError> {
    let username = normalize_username(raw)?;
    match users.find_by_username(username).await? {
        Some(user) => {
            info!(user_id = %user.id, "user logged in");
            Ok(user)
        }
        None => {
            warn!(username = %username, "login unknown username");
            Err(AppError::NotFound(
                "User does not exist. Please register first.".into(),
            ))
        }
    }
}

pub async fn find_by_id(users: &dyn UserStore, id: Uuid) -> Result<User, AppError> {
    users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
