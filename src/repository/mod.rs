//! Repository layer for database operations

pub mod books;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::book::Book};

/// Persistence operations on the `books` table.
///
/// Lookups and mutations on a missing ISBN return `AppError::NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, book: &Book) -> AppResult<Book>;
    async fn find_all(&self) -> AppResult<Vec<Book>>;
    async fn find_one(&self, isbn: &str) -> AppResult<Book>;
    async fn update(&self, isbn: &str, book: &Book) -> AppResult<Book>;
    async fn remove(&self, isbn: &str) -> AppResult<()>;
    /// Round-trip to the database, used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct, one accessor per table over a shared pool
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool),
        }
    }
}
