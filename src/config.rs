use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Which backing store the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            Ok("postgres") | Err(_) => StoreKind::Postgres,
            Ok(other) => anyhow::bail!("unknown STORE value {other:?}"),
        };
        let database_url = match store {
            StoreKind::Postgres => {
                Some(std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?)
            }
            StoreKind::Memory => std::env::var("DATABASE_URL").ok(),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "shelfkeeper".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "shelfkeeper-users".into()),
        };
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().with_context(|| format!("invalid APP_PORT {v:?}"))?,
            Err(_) => 5000,
        };
        Ok(Self {
            store,
            database_url,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
        })
    }

    /// Config for tests and the in-memory mode; nothing is read from the environment.
    pub fn for_memory(secret: &str) -> Self {
        Self {
            store: StoreKind::Memory,
            database_url: None,
            jwt: JwtConfig {
                secret: secret.into(),
                issuer: "shelfkeeper".into(),
                audience: "shelfkeeper-users".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
            cors_origin: "http://localhost:3000".into(),
        }
    }
}
