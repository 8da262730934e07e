//! Operational HTTP endpoints served next to the chat upgrade route.
//!
//! - `GET /metrics` returns Prometheus metrics in text format
//! - `GET /health` returns `ok`

use axum::{Router, routing::get};

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Routes for metrics scraping and liveness checks.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
}
