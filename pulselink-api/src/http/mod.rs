// Module: http
// HTTP/JSON API and the realtime WebSocket endpoint

pub mod error;
pub mod health;
pub mod pairing;
pub mod websocket;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pulselink_core::service::CoupleService;
use pulselink_relay::PresenceHub;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub couple_service: Arc<CoupleService>,
    pub hub: Arc<PresenceHub>,
}

/// Create the HTTP router with all routes
pub fn create_router(
    couple_service: Arc<CoupleService>,
    hub: Arc<PresenceHub>,
    allowed_origin: Option<&str>,
) -> Router {
    let state = AppState {
        couple_service,
        hub,
    };

    let router = Router::new()
        // Liveness probe (platform pings hit this to wake the instance)
        .merge(health::create_health_router())
        // Pairing routes
        .route("/api/register", post(pairing::register))
        .route("/api/login", post(pairing::login))
        // WebSocket endpoint for realtime events
        .route("/ws", get(websocket::websocket_handler));

    // Apply layers before state
    let router = router
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http());

    router.with_state(state)
}

/// Build the CORS layer: restricted to the configured origin when one is
/// set and parseable, permissive otherwise.
fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = allowed_origin.and_then(|raw| match raw.parse::<HeaderValue>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(origin = raw, error = %e, "Invalid allowed_origin, allowing any");
            None
        }
    });

    match origin {
        Some(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
