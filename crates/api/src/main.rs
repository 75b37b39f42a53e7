use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use clubhouse_api::jobs::{CapabilitySweepJob, JobScheduler};
use clubhouse_api::{app, config, middleware};
use persistence::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Clubhouse API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Build application state over the PostgreSQL store
    let store = Arc::new(PgStore::new(pool));
    let state = app::AppState::new(config, store);

    // Start background jobs (capability cache sweep, one TTL period)
    let mut scheduler = JobScheduler::new();
    scheduler.register(CapabilitySweepJob::new(
        state.capabilities.clone(),
        Duration::from_secs(state.config.cache.capability_ttl_secs),
    ));
    scheduler.start();

    // Start server
    let addr = state.config.socket_addr();
    let router = app::create_app(state);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;

    Ok(())
}
