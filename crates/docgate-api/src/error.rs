//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docgate_db::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Auth error: {0}")]
    Auth(#[from] docgate_auth::AuthError),
}

impl ApiError {
    /// Wrap a store failure with a description of the failed operation
    pub fn store(context: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }
}

impl From<DbError> for ApiError {
    fn from(source: DbError) -> Self {
        ApiError::Store {
            context: "Store operation failed",
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Auth(e) => return e.into_response(),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": msg }),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            ApiError::Store { context, source } => match source {
                DbError::InvalidId(raw) => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "success": false,
                        "message": "The provided id has an invalid format",
                        "error": format!("'{}' is not a valid record id", raw),
                    }),
                ),
                DbError::Duplicate(msg) => (
                    StatusCode::CONFLICT,
                    json!({ "success": false, "message": msg }),
                ),
                // Store detail is included in the error field
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "message": context,
                        "error": other.to_string(),
                    }),
                ),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
