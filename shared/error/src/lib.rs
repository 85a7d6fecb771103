use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// The single error type threaded from repository to service to handler.
///
/// Variants map onto the error kinds of spec §7: `ValidationError` and
/// `Conflict` both carry `400` (the distinction between "malformed
/// request" and "attempted to change `is_category`" isn't externally
/// observable, so they share a status rather than splitting `Conflict`
/// out to its own code), `NotFound` carries `404`, `Internal`/`Database`
/// carry `500`.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request or semantic batch violation (duplicate id,
    /// type change, category-with-price, offer-without-price, dangling
    /// parent, malformed date range).
    ValidationError(String),
    /// Attempted to change `is_category` on an existing unit. Carries
    /// the same status as `ValidationError`; kept distinct for logging.
    Conflict(String),
    /// Referenced id absent from the store.
    NotFound(String),
    /// Store or executor failure after a passing plan.
    Internal(String),
    /// A `sqlx` error surfaced from a repository.
    Database(sqlx::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "validation error: {msg}"),
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
            AppError::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Emits `{code:int, message:string}` with `code` equal to the HTTP
    /// status, per spec §6 — not this codebase's usual `{error, code:
    /// "STRING"}` shape. This is a deliberate protocol requirement.
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("database error: {e:?}");
                "internal server error".to_string()
            },
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                "internal server error".to_string()
            },
            AppError::ValidationError(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => {
                msg.clone()
            },
        };

        let body = Json(json!({
            "code": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}
