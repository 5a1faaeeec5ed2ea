use std::error::Error;

use axum::{
    async_trait,
    extract::{FromRequest, Query, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::app_error::AppError;

/// Query-string extractor that also runs the payload's `validator` rules,
/// turning both deserialization and validation failures into 400s.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request(req, state).await.map_err(|e| {
            let detail = e
                .source()
                .map(|source| source.to_string())
                .unwrap_or_else(|| e.body_text());
            AppError::bad_request(format!("Invalid query: {}", detail))
        })?;

        data.validate()
            .map_err(|e| AppError::bad_request(format!("Invalid query: {}", e)))?;

        Ok(ValidatedQuery(data))
    }
}
