use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credentials held by a logged-in client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

/// Durable home for the session between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<Session>>;
    fn save(&self, session: &Session) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// Keeps the session as a small JSON document (`token`, `userId`, `username`) on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read session {}", self.path.display()))
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A damaged file means no usable session, not a broken client.
                tracing::warn!(error = %e, path = %self.path.display(), "discarding unreadable session");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create session dir {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("write session {}", self.path.display()))
    }

    fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove session {}", self.path.display())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        let slot = self.slot.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
