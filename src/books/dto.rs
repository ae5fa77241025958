use serde::{Deserialize, Serialize};

use crate::extract::lenient_string;

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cover: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
