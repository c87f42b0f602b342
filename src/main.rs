//! estate-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use estate_gateway::api;
use estate_gateway::app_state::AppState;
use estate_gateway::config::GatewayConfig;
use estate_gateway::domain::EventBus;
use estate_gateway::persistence::{DocumentStore, MemoryStore, PostgresStore};
use estate_gateway::service::{AnnouncementService, FeedbackService, VisitorService};
use estate_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting estate-gateway");

    // Build the document store
    let store = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("failed to connect to postgres")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("connected to postgres document store");
        Arc::new(DocumentStore::Postgres(PostgresStore::new(pool)))
    } else {
        tracing::warn!("persistence disabled, using in-memory document store");
        Arc::new(DocumentStore::Memory(MemoryStore::new()))
    };

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let visitor_service = Arc::new(VisitorService::new(Arc::clone(&store), event_bus.clone()));
    let announcement_service = Arc::new(AnnouncementService::new(
        Arc::clone(&store),
        event_bus.clone(),
    ));
    let feedback_service = Arc::new(FeedbackService::new(Arc::clone(&store), event_bus.clone()));

    // Build application state
    let app_state = AppState {
        visitor_service,
        announcement_service,
        feedback_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
