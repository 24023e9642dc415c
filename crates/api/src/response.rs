//! Shared response envelope types for catalog mutations.
//!
//! Mutating endpoints answer with `{ "success": true, ... }` so the admin UI
//! can treat every mutation uniformly. Use these types instead of ad-hoc
//! `serde_json::json!` bodies.

use kiosk_core::record::ImageRecord;
use serde::Serialize;

/// `{ "success": true, "image": {...} }` for upload and update.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image: ImageRecord,
}

impl ImageResponse {
    pub fn ok(image: ImageRecord) -> Self {
        Self {
            success: true,
            image,
        }
    }
}

/// `{ "success": true }` for delete.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
