//! Public read-only routes, gated by the shared API key

use axum::{Json, Router, extract::State, middleware::from_fn_with_state, routing::get};
use docgate_auth::require_api_key;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{ApiResponse, PublicRecord};

/// GET /public
async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PublicRecord>>>, ApiError> {
    let records = state
        .db
        .list_records()
        .await
        .map_err(ApiError::store("Failed to list records"))?;

    Ok(Json(ApiResponse::ok(
        "Public read access granted via API key",
        records.into_iter().map(PublicRecord::from).collect(),
    )))
}

/// Create public routes
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/public", get(list_public))
        .route_layer(from_fn_with_state(state.api_keys.clone(), require_api_key))
}
