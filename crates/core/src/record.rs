//! Catalog record types.
//!
//! [`ImageRecord`] is the unit of the slideshow catalog and is serialized
//! verbatim both to the catalog file and to WebSocket clients, so its JSON
//! shape (camelCase) is part of the external interface.

use serde::{Deserialize, Serialize};

use crate::types::{ImageId, Timestamp};

/// A single slideshow image known to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: ImageId,
    /// Name of the stored file inside the image directory.
    pub filename: String,
    /// File name as supplied by the uploader.
    pub original_name: String,
    /// Path of the stored file, as written at creation time.
    pub storage_path: String,
    pub size_bytes: u64,
    pub uploaded_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Advisory display order; neither contiguous nor unique.
    pub order: i64,
    pub active: bool,
}

impl ImageRecord {
    /// Build a fresh record for a newly stored upload.
    ///
    /// The title defaults to the original file name without its extension.
    pub fn from_upload(id: ImageId, order: i64, upload: NewImage, now: Timestamp) -> Self {
        let title = crate::upload::title_from_filename(&upload.original_name);
        Self {
            id,
            filename: upload.filename,
            original_name: upload.original_name,
            storage_path: upload.storage_path,
            size_bytes: upload.size_bytes,
            uploaded_at: now,
            updated_at: None,
            title,
            description: String::new(),
            order,
            active: true,
        }
    }

    /// Merge the provided patch fields over this record and stamp
    /// `updated_at`. Fields left `None` in the patch keep their value.
    pub fn apply(&mut self, patch: ImagePatch, now: Timestamp) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = Some(now);
    }
}

/// Partial update of an [`ImageRecord`].
///
/// Only the editable fields exist here; anything else in a request body is
/// rejected at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub active: Option<bool>,
}

impl ImagePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.order.is_none()
            && self.active.is_none()
    }
}

/// Metadata for an upload that has already been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub filename: String,
    pub original_name: String,
    pub storage_path: String,
    pub size_bytes: u64,
}
