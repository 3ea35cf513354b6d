//! docgate storage layer
//!
//! Credential and record persistence for docgate, backed by SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{Database, parse_record_id};
