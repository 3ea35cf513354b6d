//! Request/Response DTOs

use docgate_db::{Record, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==================== Envelope ====================

/// Uniform response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub role: UserRole,
}

// ==================== Record Types ====================

/// Create record request
#[derive(Deserialize)]
pub struct CreateRecordRequest {
    pub title: String,
    pub content: String,
}

/// Update record request; omitted fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateRecordRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Record as exposed on the public endpoint
#[derive(Debug, Serialize)]
pub struct PublicRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl From<Record> for PublicRecord {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
        }
    }
}
