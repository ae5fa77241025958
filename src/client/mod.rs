//! Client side of the catalog: session persistence and an authenticated API wrapper.

pub mod api;
pub mod session;

pub use api::{available_to_add, AuthFailure, AuthOutcome, AuthSuccess, BookDraft, ClientError, LibraryClient};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
