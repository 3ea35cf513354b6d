//! Login route

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use docgate_auth::AuthError;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse};

/// POST /login
///
/// Trades a username and password for a bearer token.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result =
        docgate_auth::login(&state.db, &state.tokens, &request.username, &request.password).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(AuthError::InvalidCredentials) | Err(AuthError::InvalidInput(_)) => "rejected",
        Err(_) => "error",
    };
    metrics::counter!("docgate_logins_total", "outcome" => outcome).increment(1);

    let grant = result?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful. Use this access token for /private".to_string(),
        token: grant.token,
        role: grant.role,
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
