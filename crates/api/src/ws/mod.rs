//! WebSocket infrastructure for live slideshow updates.
//!
//! Provides the per-channel connection registries, the broadcast hub that
//! relays events between display and control clients, the frame types,
//! heartbeat monitoring, and the HTTP upgrade handlers.

mod handler;
mod heartbeat;
pub mod hub;
pub mod manager;
pub mod messages;

pub use handler::{control_ws_handler, display_ws_handler};
pub use heartbeat::start_heartbeat;
pub use hub::{BroadcastHub, Channel};
pub use manager::WsManager;
pub use messages::HubEvent;
