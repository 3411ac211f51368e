mod assets;
mod routes;
mod state;

pub use state::AppState;

use crate::config::Config;
use crate::core::error::RelayError;
use assets::static_routes;
use axum::Router;
use routes::{api_routes, health_routes};
use std::path::Path;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(api_routes())
        .with_state(state)
        .merge(health_routes())
        .merge(static_routes(static_dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: &Config, state: AppState) -> Result<(), RelayError> {
    let app = router(state, &config.static_dir);
    let addr = config.listen_addr();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
