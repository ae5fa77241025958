use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub cover: String,
    pub user_id: Uuid,
}

/// Validated fields of a book about to be inserted.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub cover: String,
}

/// Persistence port for books; `(user_id, title)` is unique.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books owned by `user_id`, title ascending.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Book>, StoreError>;
    async fn find_by_title(&self, user_id: Uuid, title: &str) -> Result<Option<Book>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError>;
    /// Atomic conditional insert; `StoreError::Duplicate` if the title is taken for that user.
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;
    /// Delete `id` if it is owned by `user_id`. Returns whether a row went away.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgBookStore {
    db: PgPool,
}

impl PgBookStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, cover, user_id
            FROM books
            WHERE user_id = $1
            ORDER BY title COLLATE "C" ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_title(&self, user_id: Uuid, title: &str) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, cover, user_id
            FROM books
            WHERE user_id = $1 AND title = $2
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(
            r#"SELECT id, title, author, cover, user_id FROM books WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, user_id, title, author, cover)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, title) DO NOTHING
            RETURNING id, title, author, cover, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book.user_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::Duplicate)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM books WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
