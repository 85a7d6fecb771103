//! Extractors that reshape axum's built-in rejections into the `{code,
//! message}` error body spec §6 mandates for every `400`, instead of the
//! plain-text body axum's default `PathRejection`/`QueryRejection`
//! produce. Grounded on the teacher's `FromRequestParts` extractors in
//! `shared_auth::extractors` and `user_service_api::extractors`, which
//! wrap a built-in extractor and translate its failure into this
//! service's own error type.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use shared_error::AppError;

/// A `{id}` path segment parsed as a `Uuid`, with a malformed segment
/// reported as a `ValidationError` (`400 {code, message}`) rather than
/// axum's default plain-text path-rejection body.
pub struct IdPath(pub Uuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| IdPath(id))
            .map_err(|rejection| AppError::ValidationError(format!("malformed id in path: {rejection}")))
    }
}

/// Query-string parameters, with a malformed or missing-required value
/// reported as a `ValidationError` instead of axum's default
/// plain-text query-rejection body. Covers malformed RFC 3339 dates on
/// `dateStart`/`dateEnd`/`date` and a missing required `date` on
/// `GET /sales`.
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ValidQuery(value))
            .map_err(|rejection| AppError::ValidationError(format!("malformed query parameters: {rejection}")))
    }
}

/// A JSON request body, with malformed JSON or a schema mismatch
/// reported as a `ValidationError` instead of axum's default
/// plain-text `JsonRejection` body. Used for `POST /imports`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ValidJson(value))
            .map_err(|rejection| AppError::ValidationError(format!("malformed request body: {rejection}")))
    }
}
