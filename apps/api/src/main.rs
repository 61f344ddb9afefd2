mod auth;
mod clients;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clients::{DocProcClient, TemplateClient};
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocStore, PgDocStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Verolabz API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the shared records table
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;

    // Document store over the pool
    let store: Arc<dyn DocStore> = Arc::new(PgDocStore::new(pool));

    // Remote generation clients
    let templates = TemplateClient::new(config.template_api_url.clone());
    let docproc = DocProcClient::new(config.docproc_api_url.clone());
    info!(
        "Remote clients initialized (templates: {}, processing: {})",
        config.template_api_url, config.docproc_api_url
    );

    // Build app state
    let state = AppState {
        store,
        templates,
        docproc,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
