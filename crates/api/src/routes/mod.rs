pub mod health;
pub mod images;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// ```text
/// /health                 service health
/// /images[/{id}]          catalog
/// /upload                 image upload
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(images::router(config.store.max_upload_bytes))
}

/// Build the `/ws` route tree: one endpoint per client population.
pub fn ws_routes() -> Router<AppState> {
    Router::new()
        .route("/display", get(ws::display_ws_handler))
        .route("/control", get(ws::control_ws_handler))
}
