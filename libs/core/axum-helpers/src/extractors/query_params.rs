//! Query string extractor with JSON error responses.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Extractor for query parameters.
///
/// Behaves like [`Query`] but answers a malformed query string (for example
/// `?uid=not-a-uuid`) with a 400 [`ErrorResponse`](crate::errors::ErrorResponse).
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::QueryParams;
///
/// #[derive(serde::Deserialize)]
/// struct Lookup { uid: uuid::Uuid }
///
/// async fn read(QueryParams(q): QueryParams<Lookup>) -> String {
///     format!("User ID: {}", q.uid)
/// }
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(QueryParams(value))
    }
}
