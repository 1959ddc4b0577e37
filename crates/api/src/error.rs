use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use placemark_db::store::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the API's error contract:
/// validation failures are `{"errors": [..]}` with 400, everything else is
/// `{"error": ".."}`. Store failures are logged server-side and surface as a
/// generic 500 with no internal detail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more validation rules failed; reported before any mutation.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// The addressed entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated (e.g. duplicate category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                axum::Json(json!({ "error": format!("{entity} not found") })),
            )
                .into_response(),
            // Uniqueness conflicts report as 400, not 409.
            ApiError::Conflict(message) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({ "error": "An unexpected error occurred" })),
                )
                    .into_response()
            }
        }
    }
}
