use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use pulselink_api::http::create_router;
use pulselink_core::{
    bootstrap::{init_database, load_config},
    logging,
    repository::CoupleRepository,
    service::CoupleService,
};
use pulselink_relay::PresenceHub;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("PulseLink server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Initialize database
    let pool = init_database(&config).await?;

    // 4. Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            error!("Failed to run migrations: {}", e);
            anyhow::anyhow!("Migration failed: {e}")
        })?;
    info!("Migrations completed");

    // 5. Wire the services and the presence hub
    let couple_repository = Arc::new(CoupleRepository::new(pool));
    let couple_service = Arc::new(CoupleService::new(couple_repository));
    let hub = Arc::new(PresenceHub::new());

    let app = create_router(
        couple_service,
        hub,
        config.server.allowed_origin.as_deref(),
    );

    // 6. Serve with graceful shutdown
    let listener = tokio::net::TcpListener::bind(config.http_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
