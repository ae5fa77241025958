use axum::{extract::rejection::JsonRejection, extract::FromRequest};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;

/// `Json` whose rejections come back as `400 {"error": …}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected request body");
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Scalar JSON field as text: numbers and booleans are stringified,
/// `null`, arrays and objects become empty so validation reports them as missing.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
