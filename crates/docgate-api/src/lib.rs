//! docgate REST API
//!
//! This crate provides the Axum-based HTTP API for docgate: the login
//! endpoint, the API-key gated public listing and the token gated private
//! record endpoints.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
