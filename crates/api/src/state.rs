use std::sync::Arc;
use std::time::Instant;

use kiosk_store::ImageStore;

use crate::config::ServerConfig;
use crate::ws::BroadcastHub;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The image catalog. Handlers read and mutate it only through its methods.
    pub store: Arc<ImageStore>,
    /// Display and control WebSocket channels.
    pub hub: Arc<BroadcastHub>,
    /// Process start, reported as uptime by the health check.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<ImageStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            hub: Arc::new(BroadcastHub::new()),
            started_at: Instant::now(),
        }
    }
}
