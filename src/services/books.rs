//! Book management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
    strict_create: bool,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>, strict_create: bool) -> Self {
        Self {
            store,
            strict_create,
        }
    }

    /// Create a book from a validated payload.
    ///
    /// Keys outside the schema are ignored with a warning unless
    /// `strict_create` is set, in which case they are rejected.
    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        let unknown = data.unknown_fields();
        if !unknown.is_empty() {
            if self.strict_create {
                return Err(AppError::Validation(
                    unknown
                        .iter()
                        .map(|field| format!("unknown field `{}`", field))
                        .collect(),
                ));
            }
            tracing::warn!("Ignoring unknown fields on book create: {}", unknown.join(", "));
        }

        let book = self.store.create(&data.into_book()).await?;
        tracing::info!("Created book isbn={}", book.isbn);
        Ok(book)
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.find_all().await
    }

    pub async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.store.find_one(isbn).await.map_err(|e| {
            if let AppError::NotFound(_) = e {
                tracing::debug!("Book isbn={} not found", isbn);
            }
            e
        })
    }

    /// Replace all non-key fields of the book stored under `isbn`.
    ///
    /// The key is immutable: a different `isbn` in the body is ignored.
    pub async fn update(&self, isbn: &str, data: UpdateBook) -> AppResult<Book> {
        if let Some(body_isbn) = data.isbn.as_deref().filter(|body_isbn| *body_isbn != isbn) {
            tracing::warn!(
                "Ignoring isbn '{}' in update body for book isbn={}",
                body_isbn,
                isbn
            );
        }

        let book = self.store.update(isbn, &data.into_book(isbn)).await?;
        tracing::info!("Updated book isbn={}", isbn);
        Ok(book)
    }

    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.store.remove(isbn).await?;
        tracing::info!("Deleted book isbn={}", isbn);
        Ok(())
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
