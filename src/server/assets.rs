//! Static frontend served from a directory on disk

use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

pub fn static_routes(dir: &Path) -> Router {
    tracing::info!("Serving static assets from: {}", dir.display());

    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .fallback_service(ServeDir::new(dir))
}
