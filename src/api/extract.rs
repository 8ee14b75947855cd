//! Request body extraction with schema validation

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been deserialized and passed `Validate`.
///
/// Every failure (bad content type, malformed JSON, wrong field types,
/// unknown fields on closed schemas, constraint violations) becomes
/// `AppError::Validation`, so handlers never touch the store with bad input.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid(rejection.body_text()))?;

        let data: T =
            serde_json::from_value(value).map_err(|e| AppError::invalid(e.to_string()))?;
        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
