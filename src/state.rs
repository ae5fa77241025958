use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgUserStore, UserStore};
use crate::books::repo::{BookStore, PgBookStore};
use crate::config::{AppConfig, StoreKind};
use crate::db;
use crate::store::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        match config.store {
            StoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
                let pool = db::connect(url).await?;
                db::migrate(&pool).await?;
                let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
                let books = Arc::new(PgBookStore::new(pool)) as Arc<dyn BookStore>;
                Ok(Self::from_parts(config, users, books))
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config,
            keys,
            users,
            books,
        }
    }

    /// Both ports backed by one shared [`MemoryStore`].
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let store = Arc::new(MemoryStore::default());
        Self::from_parts(
            config,
            store.clone() as Arc<dyn UserStore>,
            store as Arc<dyn BookStore>,
        )
    }

    pub fn fake() -> Self {
        Self::in_memory(Arc::new(AppConfig::for_memory("test-secret")))
    }
}
