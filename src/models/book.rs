//! Book model and request payloads

use std::collections::BTreeMap;

use serde::{
    de::{self, Unexpected},
    Deserialize, Deserializer, Serialize,
};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Natural key, supplied by the caller
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Create book request.
///
/// Every field is optional at the serde level so that all missing fields are
/// reported together by `validate()`. Keys outside the schema are collected
/// in `extra`; whether they are an error is decided by the service.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(required(message = "isbn is required"))]
    pub isbn: Option<String>,
    #[validate(required(message = "amazon_url is required"))]
    pub amazon_url: Option<String>,
    #[validate(required(message = "author is required"))]
    pub author: Option<String>,
    #[validate(required(message = "language is required"))]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    #[validate(required(message = "pages is required"))]
    pub pages: Option<i32>,
    #[validate(required(message = "publisher is required"))]
    pub publisher: Option<String>,
    #[validate(required(message = "title is required"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    #[validate(required(message = "year is required"))]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CreateBook {
    /// Names of keys outside the create schema
    pub fn unknown_fields(&self) -> Vec<&str> {
        self.extra.keys().map(String::as_str).collect()
    }

    /// Convert a validated payload into a record
    pub fn into_book(self) -> Book {
        Book {
            isbn: self.isbn.unwrap_or_default(),
            amazon_url: self.amazon_url.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            pages: self.pages.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
        }
    }
}

/// Update book request. Same fields as create, but the field set is closed.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBook {
    #[validate(required(message = "isbn is required"))]
    pub isbn: Option<String>,
    #[validate(required(message = "amazon_url is required"))]
    pub amazon_url: Option<String>,
    #[validate(required(message = "author is required"))]
    pub author: Option<String>,
    #[validate(required(message = "language is required"))]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    #[validate(required(message = "pages is required"))]
    pub pages: Option<i32>,
    #[validate(required(message = "publisher is required"))]
    pub publisher: Option<String>,
    #[validate(required(message = "title is required"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    #[validate(required(message = "year is required"))]
    pub year: Option<i32>,
}

impl UpdateBook {
    /// Convert a validated payload into a record stored under `isbn`
    pub fn into_book(self, isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: self.amazon_url.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            pages: self.pages.unwrap_or_default(),
            publisher: self.publisher.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
        }
    }
}

/// Accept JSON integers, and floats with no fractional part such as `100.0`
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let whole = match number.as_i64() {
        Some(n) => i32::try_from(n).ok(),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX))
            .map(|f| f as i32),
    };

    match whole {
        Some(n) => Ok(Some(n)),
        None => {
            let shown = number.to_string();
            Err(de::Error::invalid_value(
                Unexpected::Other(&shown),
                &"an integer",
            ))
        }
    }
}

/// `{ "book": ... }` envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

/// `{ "books": [...] }` envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// `{ "message": ... }` envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
