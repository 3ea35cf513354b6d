//! Private record routes, gated by bearer tokens

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, put},
};
use docgate_auth::{AuthUser, RequiredRoles, require_roles, require_token};
use docgate_db::{NewRecord, Record, RecordUpdate, parse_record_id};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{ApiResponse, CreateRecordRequest, UpdateRecordRequest};

/// POST /private
async fn create_record(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = state
        .db
        .insert_record(NewRecord {
            title: request.title,
            content: request.content,
            owner: user.username.clone(),
        })
        .await
        .map_err(ApiError::store("Failed to create record"))?;

    metrics::counter!("docgate_records_written_total", "op" => "create").increment(1);
    info!("User {} created record {}", user.username, record.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Record created", record)),
    ))
}

/// GET /private
async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Record>>>, ApiError> {
    let records = state
        .db
        .list_records()
        .await
        .map_err(ApiError::store("Failed to list records"))?;

    Ok(Json(ApiResponse::ok("Private read access granted", records)))
}

/// PUT /private/{id}
async fn update_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let id = parse_record_id(&raw_id)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = state
        .db
        .update_record(
            id,
            RecordUpdate {
                title: request.title,
                content: request.content,
            },
        )
        .await
        .map_err(ApiError::store("Failed to update record"))?
        .ok_or_else(|| ApiError::NotFound(format!("Record with id {} not found", id)))?;

    metrics::counter!("docgate_records_written_total", "op" => "update").increment(1);
    info!("User {} updated record {}", user.username, record.id);

    Ok(Json(ApiResponse::ok("Record updated", record)))
}

/// DELETE /private/{id}
async fn delete_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let id = parse_record_id(&raw_id)?;

    let record = state
        .db
        .delete_record(id)
        .await
        .map_err(ApiError::store("Failed to delete record"))?
        .ok_or_else(|| ApiError::NotFound(format!("Record with id {} not found", id)))?;

    metrics::counter!("docgate_records_written_total", "op" => "delete").increment(1);
    info!("Admin {} deleted record {}", user.username, record.id);

    Ok(Json(ApiResponse::ok("Record deleted by admin", record)))
}

/// Create private routes
///
/// Every route requires a bearer token; deletion additionally requires the
/// admin role.
pub fn routes(state: &AppState) -> Router<AppState> {
    let admin_only = delete(delete_record).route_layer(from_fn_with_state(
        RequiredRoles::admin_only(),
        require_roles,
    ));

    Router::new()
        .route("/private", get(list_records).post(create_record))
        .route("/private/{id}", put(update_record).merge(admin_only))
        .route_layer(from_fn_with_state(state.tokens.clone(), require_token))
}
