//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookResponse, BooksResponse, CreateBook, MessageResponse, UpdateBook},
};

use super::extract::ValidatedJson;

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = crate::models::book::Book,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.books.create(data).await?;
    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.list().await?;
    Ok(Json(BooksResponse { books }))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get(&isbn).await?;
    Ok(Json(BookResponse { book }))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = crate::models::book::Book,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
    ValidatedJson(data): ValidatedJson<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.update(&isbn, data).await?;
    Ok(Json(BookResponse { book }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&isbn).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}
