//! In-process store behind both repository ports. Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::repo::{User, UserStore},
    books::repo::{Book, BookStore, NewBook},
    error::StoreError,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    books: HashMap<Uuid, Book>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, username: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Book>, StoreError> {
        let inner = self.inner.read().await;
        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_by_title(&self, user_id: Uuid, title: &str) -> Result<Option<Book>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .books
            .values()
            .find(|b| b.user_id == user_id && b.title == title)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .books
            .values()
            .any(|b| b.user_id == book.user_id && b.title == book.title)
        {
            return Err(StoreError::Duplicate);
        }
        let book = Book {
            id: Uuid::new_v4(),
            title: book.title,
            author: book.author,
            cover: book.cover,
            user_id: book.user_id,
        };
        inner.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.books.get(&id) {
            Some(b) if b.user_id == user_id => {
                inner.books.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
