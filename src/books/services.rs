use tracing::{info, warn};
use uuid::Uuid;

use super::repo::{Book, BookStore, NewBook};
use crate::error::{AppError, StoreError};

const DUPLICATE_TITLE: &str = "You already added this book!";

pub async fn list(books: &dyn BookStore, user_id: Uuid) -> Result<Vec<Book>, AppError> {
    Ok(books.list_by_user(user_id).await?)
}

/// Trimmed fields, or `InvalidInput` if any of them is empty.
pub fn validate(user_id: Uuid, title: &str, author: &str, cover: &str) -> Result<NewBook, AppError> {
    let (title, author, cover) = (title.trim(), author.trim(), cover.trim());
    if title.is_empty() || author.is_empty() || cover.is_empty() {
        return Err(AppError::InvalidInput("All fields are required".into()));
    }
    Ok(NewBook {
        user_id,
        title: title.to_string(),
        author: author.to_string(),
        cover: cover.to_string(),
    })
}

pub async fn add(
    books: &dyn BookStore,
    user_id: Uuid,
    title: &str,
    author: &str,
    cover: &str,
) -> Result<Book, AppError> {
    let new_book = validate(user_id, title, author, cover)?;

    // Only an early answer; the store's unique key is authoritative.
    if books.find_by_title(user_id, &new_book.title).await?.is_some() {
        warn!(%user_id, title = %new_book.title, "duplicate title");
        return Err(AppError::Conflict(DUPLICATE_TITLE.into()));
    }

    let book = books.insert(new_book).await.map_err(|e| match e {
        StoreError::Duplicate => {
            warn!(%user_id, "duplicate title caught by unique key");
            AppError::Conflict(DUPLICATE_TITLE.into())
        }
        other => other.into(),
    })?;
    info!(%user_id, book_id = %book.id, "book added");
    Ok(book)
}

pub async fn remove(books: &dyn BookStore, user_id: Uuid, book_id: Uuid) -> Result<(), AppError> {
    let book = books
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".into()))?;

    if book.user_id != user_id {
        warn!(%user_id, %book_id, owner = %book.user_id, "delete by non-owner");
        return Err(AppError::Forbidden("Unauthorized to delete this book".into()));
    }

    if !books.delete(book_id, user_id).await? {
        // Removed concurrently between lookup and delete.
        return Err(AppError::NotFound("Book not found".into()));
    }
    info!(%user_id, %book_id, "book deleted");
    Ok(())
}
