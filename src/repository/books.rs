//! Books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("There is no book with an isbn '{}'", isbn))
}

#[async_trait]
impl BookStore for BooksRepository {
    /// Insert a book. A duplicate ISBN surfaces as a database error.
    async fn create(&self, book: &Book) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books ({0})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {0}
            "#,
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(&book.isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// List all books in storage order
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_one(&self, isbn: &str) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(isbn))
    }

    /// Overwrite every non-key column of the row matching `isbn`
    async fn update(&self, isbn: &str, book: &Book) -> AppResult<Book> {
        let query = format!(
            r#"
            UPDATE books
            SET amazon_url = $1, author = $2, language = $3, pages = $4,
                publisher = $5, title = $6, year = $7
            WHERE isbn = $8
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(isbn))
    }

    async fn remove(&self, isbn: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(isbn));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
