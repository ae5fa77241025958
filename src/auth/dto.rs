use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::lenient_string;

/// Request body for both registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
}

/// Response returned after register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

/// Public part of the user returned by `/me`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: Uuid,
    pub username: String,
}
