//! Application state

use docgate_auth::{ApiKeyGate, TokenCodec};
use docgate_db::Database;
use std::sync::Arc;

/// Prometheus render handle used by the metrics endpoint
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenCodec>,
    pub api_keys: Arc<ApiKeyGate>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenCodec>, api_keys: Arc<ApiKeyGate>) -> Self {
        Self {
            db,
            tokens,
            api_keys,
        }
    }
}
