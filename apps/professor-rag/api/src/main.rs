use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // A missing .env file is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    info!(
        result_count = config.rag.result_count,
        embedding_model = %config.rag.embedding_model,
        completion_model = %config.rag.completion_model,
        "Loaded RAG configuration"
    );

    let state = AppState::new(config).await?;

    // Build router with API routes
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    let app = router.merge(health_router(state.config.app));

    info!("Starting professor RAG API with graceful shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        async move {
            // Upstream clients hold no server-side sessions; dropping them closes pooled connections
            drop(state);
            info!("Released upstream HTTP clients");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Professor RAG API shutdown complete");
    Ok(())
}
