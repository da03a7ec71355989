//! Liveness endpoint
//!
//! Served at the root path so platform probes and cold-start pings hit it
//! without touching the database.

use axum::{response::IntoResponse, routing::get, Router};

use crate::http::AppState;

/// Liveness router
pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/", get(liveness))
}

/// Static liveness text (always returned while the process is serving)
pub async fn liveness() -> impl IntoResponse {
    "online"
}
