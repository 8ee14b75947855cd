//! Books API integration tests
//!
//! Needs a running server and its database:
//! `DATABASE_URL=... cargo test --test books_api -- --ignored`

use std::sync::OnceLock;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::{Mutex, MutexGuard};

const BASE_URL: &str = "http://localhost:8080";
const SEED_ISBN: &str = "123432122";

/// Tests share the `books` table
static TABLE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct Fixture {
    client: Client,
    pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Reset the table to a single known book
async fn setup() -> Fixture {
    let guard = TABLE_LOCK.get_or_init(|| Mutex::new(())).lock().await;

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::query("DELETE FROM books")
        .execute(&pool)
        .await
        .expect("Failed to clear books");
    sqlx::query(
        r#"
        INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
        VALUES ($1, 'https://amazon.com/taco', 'Elie', 'English', 100, 'Nothing publishers', 'my first book', 2008)
        "#,
    )
    .bind(SEED_ISBN)
    .execute(&pool)
    .await
    .expect("Failed to seed book");

    Fixture {
        client: Client::new(),
        pool,
        _guard: guard,
    }
}

fn new_book(isbn: &str, title: &str) -> Value {
    json!({
        "isbn": isbn,
        "amazon_url": "https://taco.com",
        "author": "mctest",
        "language": "english",
        "pages": 1000,
        "publisher": "yeah right",
        "title": title,
        "year": 2000
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_create_book() {
    let fx = setup().await;
    let payload = new_book("32794782", "amazing times");

    let response = fx
        .client
        .post(format!("{}/books", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"], payload);

    let response = fx
        .client
        .get(format!("{}/books/32794782", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"], payload);
}

#[tokio::test]
#[ignore]
async fn test_create_duplicate_isbn() {
    let fx = setup().await;

    let response = fx
        .client
        .post(format!("{}/books", BASE_URL))
        .json(&new_book(SEED_ISBN, "my first book"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let title: String = sqlx::query_scalar("SELECT title FROM books WHERE isbn = $1")
        .bind(SEED_ISBN)
        .fetch_one(&fx.pool)
        .await
        .expect("Failed to read title");
    assert_eq!(title, "my first book");
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_title() {
    let fx = setup().await;

    let response = fx
        .client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "year": 2020 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(&fx.pool)
        .await
        .expect("Failed to count books");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let fx = setup().await;

    let response = fx
        .client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], SEED_ISBN);
    assert!(books[0]["amazon_url"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_get_book() {
    let fx = setup().await;

    let response = fx
        .client
        .get(format!("{}/books/{}", BASE_URL, SEED_ISBN))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["isbn"], SEED_ISBN);
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book() {
    let fx = setup().await;

    let response = fx
        .client
        .get(format!("{}/books/666", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_update_book() {
    let fx = setup().await;

    let response = fx
        .client
        .put(format!("{}/books/{}", BASE_URL, SEED_ISBN))
        .json(&new_book(SEED_ISBN, "UPDATED BOOK"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["title"], "UPDATED BOOK");

    let title: String = sqlx::query_scalar("SELECT title FROM books WHERE isbn = $1")
        .bind(SEED_ISBN)
        .fetch_one(&fx.pool)
        .await
        .expect("Failed to read title");
    assert_eq!(title, "UPDATED BOOK");
}

#[tokio::test]
#[ignore]
async fn test_update_book_with_unknown_field() {
    let fx = setup().await;

    let mut payload = new_book("32794782", "UPDATED BOOK");
    payload["badField"] = json!("DO NOT ADD ME!");

    let response = fx
        .client
        .put(format!("{}/books/{}", BASE_URL, SEED_ISBN))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_delete_book() {
    let fx = setup().await;

    let response = fx
        .client
        .delete(format!("{}/books/{}", BASE_URL, SEED_ISBN))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let response = fx
        .client
        .get(format!("{}/books/{}", BASE_URL, SEED_ISBN))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
