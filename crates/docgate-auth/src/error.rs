//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid login input: {0}")]
    InvalidInput(String),

    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Requires role: {required}")]
    InsufficientPermissions { required: String },

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Credential store error: {0}")]
    Store(#[from] docgate_db::DbError),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::MissingApiKey
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidApiKey
            | AuthError::InvalidToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::PasswordHash(_) | AuthError::Jwt(_) | AuthError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message; never says which token check failed
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::InvalidInput(msg) => msg.clone(),
            AuthError::MissingApiKey => "Access denied. API key not provided".to_string(),
            AuthError::InvalidApiKey => "Access denied. Invalid API key".to_string(),
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                "Access denied. Bearer token not found".to_string()
            }
            AuthError::InvalidToken | AuthError::InvalidSignature | AuthError::TokenExpired => {
                "Token is invalid or expired".to_string()
            }
            AuthError::InsufficientPermissions { required } => {
                format!("Access denied. Requires role: {}", required)
            }
            AuthError::PasswordHash(_) | AuthError::Jwt(_) | AuthError::Store(_) => {
                "Internal error".to_string()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "success": false,
            "message": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_invalid_are_distinct() {
        assert_eq!(AuthError::MissingApiKey.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidApiKey.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::MissingAuthHeader.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::FORBIDDEN);
        assert_ne!(
            AuthError::MissingAuthHeader.public_message(),
            AuthError::InvalidToken.public_message()
        );
    }

    #[test]
    fn test_token_failures_share_one_message() {
        let expired = AuthError::TokenExpired.public_message();
        assert_eq!(AuthError::InvalidSignature.public_message(), expired);
        assert_eq!(AuthError::InvalidToken.public_message(), expired);
        assert!(expired.contains("invalid or expired"));
    }

    #[test]
    fn test_role_message_names_required_roles() {
        let err = AuthError::InsufficientPermissions {
            required: "admin".to_string(),
        };
        assert_eq!(err.public_message(), "Access denied. Requires role: admin");
    }
}
