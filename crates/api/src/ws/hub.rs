//! Broadcast Hub: relays events between display and control clients.
//!
//! Delivery is best-effort fan-out. Nothing is persisted or acknowledged;
//! order is preserved per connection only, because each connection drains
//! its own channel.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::ws::Message;
use kiosk_store::ImageStore;
use tokio::sync::mpsc;

use crate::ws::manager::WsManager;
use crate::ws::messages::{ControlMessage, DisplayMessage, HubEvent};

/// The two disjoint client populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Browsers showing the slideshow.
    Display,
    /// Touch-screen companions issuing navigation commands.
    Control,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Display => "display",
            Channel::Control => "control",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display and control registries plus the last slide state reported by a
/// display.
pub struct BroadcastHub {
    display: WsManager,
    control: WsManager,
    slide_index: AtomicUsize,
    is_playing: AtomicBool,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            display: WsManager::new(),
            control: WsManager::new(),
            slide_index: AtomicUsize::new(0),
            is_playing: AtomicBool::new(true),
        }
    }

    pub fn manager(&self, channel: Channel) -> &WsManager {
        match channel {
            Channel::Display => &self.display,
            Channel::Control => &self.control,
        }
    }

    /// Last reported `(slide_index, is_playing)`.
    pub fn slide_state(&self) -> (usize, bool) {
        (
            self.slide_index.load(Ordering::Relaxed),
            self.is_playing.load(Ordering::Relaxed),
        )
    }

    /// Register a connection and queue its greeting.
    ///
    /// Displays get the catalog snapshot; control clients get the current
    /// slide and play state. The connection is registered before the
    /// greeting is queued, so no broadcast issued afterwards can be missed.
    pub async fn connect(
        &self,
        channel: Channel,
        conn_id: &str,
        store: &ImageStore,
    ) -> mpsc::UnboundedReceiver<Message> {
        let rx = self.manager(channel).add(conn_id.to_string()).await;

        match channel {
            Channel::Display => {
                let images = store.list().await;
                self.send(channel, conn_id, &HubEvent::ImagesList { images })
                    .await;
            }
            Channel::Control => {
                let (slide_index, is_playing) = self.slide_state();
                self.send(channel, conn_id, &HubEvent::CurrentSlide { slide_index })
                    .await;
                self.send(channel, conn_id, &HubEvent::PlayState { is_playing })
                    .await;
            }
        }

        rx
    }

    pub async fn disconnect(&self, channel: Channel, conn_id: &str) {
        if let Some(duration) = self.manager(channel).remove(conn_id).await {
            tracing::debug!(
                %channel,
                conn_id,
                connected_secs = duration.num_seconds(),
                "Client unregistered"
            );
        }
    }

    /// Queue `event` for one connection.
    pub async fn send(&self, channel: Channel, conn_id: &str, event: &HubEvent) -> bool {
        match event.to_message() {
            Ok(message) => self.manager(channel).send_to(conn_id, message).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize hub event");
                false
            }
        }
    }

    /// Fan `event` out to every client on `channel`.
    ///
    /// Returns the number of clients it was queued for.
    pub async fn broadcast(&self, channel: Channel, event: &HubEvent) -> usize {
        match event.to_message() {
            Ok(message) => {
                let delivered = self.manager(channel).broadcast(message).await;
                tracing::debug!(%channel, delivered, "Broadcast hub event");
                delivered
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize hub event");
                0
            }
        }
    }

    /// Dispatch an inbound text frame from `conn_id` on `channel`.
    ///
    /// Malformed or unknown frames are logged and ignored.
    pub async fn handle_text(&self, channel: Channel, conn_id: &str, text: &str, store: &ImageStore) {
        match channel {
            Channel::Control => match serde_json::from_str::<ControlMessage>(text) {
                Ok(msg) => self.handle_control(conn_id, msg, store).await,
                Err(e) => {
                    tracing::debug!(%channel, conn_id, error = %e, "Ignoring unrecognized frame");
                }
            },
            Channel::Display => match serde_json::from_str::<DisplayMessage>(text) {
                Ok(msg) => self.handle_display(conn_id, msg, store).await,
                Err(e) => {
                    tracing::debug!(%channel, conn_id, error = %e, "Ignoring unrecognized frame");
                }
            },
        }
    }

    pub async fn handle_control(&self, conn_id: &str, msg: ControlMessage, store: &ImageStore) {
        match msg {
            ControlMessage::Navigate { slide_index } => {
                self.broadcast(Channel::Display, &HubEvent::NavigateTo { slide_index })
                    .await;
            }
            ControlMessage::PlayPause { is_playing } => {
                self.broadcast(Channel::Display, &HubEvent::PlayPause { is_playing })
                    .await;
            }
            ControlMessage::RequestImages => {
                let images = store.list().await;
                self.send(Channel::Control, conn_id, &HubEvent::ImagesList { images })
                    .await;
            }
        }
    }

    pub async fn handle_display(&self, conn_id: &str, msg: DisplayMessage, store: &ImageStore) {
        match msg {
            DisplayMessage::CurrentSlide { slide_index } => {
                self.slide_index.store(slide_index, Ordering::Relaxed);
                self.broadcast(Channel::Control, &HubEvent::CurrentSlide { slide_index })
                    .await;
            }
            DisplayMessage::PlayState { is_playing } => {
                self.is_playing.store(is_playing, Ordering::Relaxed);
                self.broadcast(Channel::Control, &HubEvent::PlayState { is_playing })
                    .await;
            }
            DisplayMessage::RequestImages => {
                let images = store.list().await;
                self.send(Channel::Display, conn_id, &HubEvent::ImagesList { images })
                    .await;
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.display.connection_count().await + self.control.connection_count().await
    }

    pub async fn ping_all(&self) {
        self.display.ping_all().await;
        self.control.ping_all().await;
    }

    pub async fn shutdown_all(&self) {
        self.display.shutdown_all().await;
        self.control.shutdown_all().await;
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
