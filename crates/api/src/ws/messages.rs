//! WebSocket frame types.
//!
//! Every frame is a JSON text message shaped `{"type": "<kind>", ...}` with
//! camelCase payload fields. Outbound frames are [`HubEvent`]s; inbound
//! frames are parsed per channel into [`ControlMessage`] or
//! [`DisplayMessage`].

use axum::extract::ws::Message;
use kiosk_core::record::ImageRecord;
use kiosk_core::types::ImageId;
use serde::{Deserialize, Serialize};

/// Frames the server sends to display or control clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HubEvent {
    /// Full catalog snapshot.
    ImagesList { images: Vec<ImageRecord> },
    ImageUploaded { image: ImageRecord },
    ImageUpdated { image: ImageRecord },
    ImageDeleted { id: ImageId },
    /// Slide currently shown by the display (to control clients).
    CurrentSlide { slide_index: usize },
    /// Whether the display slideshow is playing (to control clients).
    PlayState { is_playing: bool },
    /// Jump to a slide (to display clients).
    NavigateTo { slide_index: usize },
    /// Toggle playback, or force it when `is_playing` is set (to display clients).
    PlayPause {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_playing: Option<bool>,
    },
}

impl HubEvent {
    /// Serialize into a WebSocket text frame.
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}

/// Frames accepted from control (touch) clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ControlMessage {
    #[serde(alias = "navigate-to")]
    Navigate { slide_index: usize },
    PlayPause {
        #[serde(default)]
        is_playing: Option<bool>,
    },
    RequestImages,
}

/// Frames accepted from display clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum DisplayMessage {
    CurrentSlide { slide_index: usize },
    PlayState { is_playing: bool },
    RequestImages,
}
