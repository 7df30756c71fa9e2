use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
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

    let config = Config::from_env()?;

    init_tracing(
        &config.environment,
        &["reguser_api", "domain_users", "axum_helpers"],
    );

    // SIGINT/SIGTERM cancel this root token and every request token derived from it
    let shutdown = ShutdownCoordinator::new();
    let state = AppState::new(config, shutdown.clone());

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server);

    // - /health: liveness check with app name/version
    // - /ready: readiness check probing the user store
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        search_send_timeout = ?state.config.search.send_timeout,
        search_buffer = state.config.search.buffer,
        "Starting reguser API"
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, shutdown, async move {
        // The in-memory store has nothing to flush; dropping it frees the map
        drop(state);
        info!("User store released");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Reguser API shutdown complete");
    Ok(())
}
