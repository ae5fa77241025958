use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::session::{Session, SessionStore};
use crate::auth::dto::{AuthResponse, PublicUser};
use crate::books::{dto::MessageResponse, repo::Book};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please log in first")]
    NotLoggedIn,
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session storage: {0}")]
    Store(#[source] anyhow::Error),
}

/// The server's register/login body, kept as-is on the client side.
pub type AuthSuccess = AuthResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub message: String,
}

/// Result of a register or login call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success(AuthSuccess),
    Failure(AuthFailure),
}

/// A book as offered to the user before it is in their library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub cover: String,
}

/// Suggestions whose title is not already in `library`.
pub fn available_to_add<'a>(suggestions: &'a [BookDraft], library: &[Book]) -> Vec<&'a BookDraft> {
    suggestions
        .iter()
        .filter(|s| !library.iter().any(|b| b.title == s.title))
        .collect()
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
}

/// Human-readable message from a non-2xx response.
async fn failure_message(res: Response) -> String {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if !text.trim().is_empty() => text,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

/// HTTP client for the catalog API that owns the caller's session.
pub struct LibraryClient<S> {
    http: reqwest::Client,
    base_url: String,
    store: S,
    session: Option<Session>,
}

impl<S: SessionStore> LibraryClient<S> {
    /// Restores any session persisted in `store`.
    pub fn new(base_url: impl Into<String>, store: S) -> Result<Self, ClientError> {
        let session = store.load().map_err(ClientError::Store)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(&session.token))
    }

    pub async fn register(&mut self, username: &str) -> Result<AuthOutcome, ClientError> {
        self.authenticate("/register", username).await
    }

    pub async fn login(&mut self, username: &str) -> Result<AuthOutcome, ClientError> {
        self.authenticate("/login", username).await
    }

    async fn authenticate(&mut self, path: &str, username: &str) -> Result<AuthOutcome, ClientError> {
        let res = self
            .http
            .post(self.url(path))
            .json(&Credentials { username })
            .send()
            .await?;

        if !res.status().is_success() {
            let message = failure_message(res).await;
            debug!(%message, "authentication refused");
            return Ok(AuthOutcome::Failure(AuthFailure { message }));
        }

        let success: AuthSuccess = res.json().await?;
        let session = Session {
            token: success.token.clone(),
            user_id: success.user_id,
            username: success.username.clone(),
        };
        self.store.save(&session).map_err(ClientError::Store)?;
        self.session = Some(session);
        info!(username = %success.username, "logged in");
        Ok(AuthOutcome::Success(success))
    }

    /// Forget the session locally. The token itself stays valid until it expires.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session = None;
        self.store.clear().map_err(ClientError::Store)
    }

    /// Fetch the library. A rejected credential logs the client out.
    pub async fn list_books(&mut self) -> Result<Vec<Book>, ClientError> {
        let res = self.authed(Method::GET, "/books")?.send().await?;
        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("session rejected, logging out");
                self.session = None;
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to clear stored session");
                }
                Err(ClientError::SessionExpired)
            }
            s if s.is_success() => Ok(res.json().await?),
            s => Err(ClientError::Api {
                status: s.as_u16(),
                message: failure_message(res).await,
            }),
        }
    }

    pub async fn add_book(&self, draft: &BookDraft) -> Result<Book, ClientError> {
        let res = self.authed(Method::POST, "/books")?.json(draft).send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Api {
                status: res.status().as_u16(),
                message: failure_message(res).await,
            });
        }
        Ok(res.json().await?)
    }

    pub async fn delete_book(&self, id: Uuid) -> Result<String, ClientError> {
        let res = self
            .authed(Method::DELETE, &format!("/books/{id}"))?
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(ClientError::Api {
                status: res.status().as_u16(),
                message: failure_message(res).await,
            });
        }
        let body: MessageResponse = res.json().await?;
        Ok(body.message)
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        let res = self.authed(Method::GET, "/me")?.send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Api {
                status: res.status().as_u16(),
                message: failure_message(res).await,
            });
        }
        Ok(res.json().await?)
    }
}
