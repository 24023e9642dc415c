//! Handler for `POST /api/upload`.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use kiosk_core::error::CoreError;
use kiosk_core::record::NewImage;
use kiosk_core::upload::{stored_file_name, validate_extension, validate_size};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};
use crate::response::ImageResponse;
use crate::state::AppState;
use crate::ws::{Channel, HubEvent};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "image";

/// Extra body allowance on top of the file size limit for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// POST /api/upload
///
/// Streams the `image` field to disk under a generated name, then records it
/// in the store and announces it to display clients. The partially written
/// file is removed if anything fails before the record is stored.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImageResponse>> {
    let config = state.store.config();

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("Field '{UPLOAD_FIELD}' must be a file")))?;
        let ext = validate_extension(&original_name)?;

        let stamp = chrono::Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let filename = stored_file_name(stamp, &suffix[..8], &ext);
        let path = config.image_path(&filename);

        let size_bytes = match stream_to_file(&mut field, &path, config.max_upload_bytes).await {
            Ok(size) => size,
            Err(e) => {
                discard(&path).await;
                return Err(e);
            }
        };

        let new_image = NewImage {
            filename,
            original_name,
            storage_path: path.to_string_lossy().into_owned(),
            size_bytes,
        };
        let image = match state.store.add(new_image).await {
            Ok(image) => image,
            Err(e) => {
                discard(&path).await;
                return Err(e.into());
            }
        };

        state
            .hub
            .broadcast(Channel::Display, &HubEvent::ImageUploaded { image: image.clone() })
            .await;

        return Ok(Json(ImageResponse::ok(image)));
    }

    Err(AppError::BadRequest(format!(
        "No file uploaded in field '{UPLOAD_FIELD}'"
    )))
}

/// Write the field to `path` chunk by chunk, enforcing `max_bytes`.
async fn stream_to_file(field: &mut Field<'_>, path: &Path, max_bytes: u64) -> AppResult<u64> {
    let mut file = tokio::fs::File::create(path).await.map_err(CoreError::from)?;
    let mut written: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        written += chunk.len() as u64;
        validate_size(written, max_bytes)?;
        file.write_all(&chunk).await.map_err(CoreError::from)?;
    }

    file.flush().await.map_err(CoreError::from)?;
    Ok(written)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
        }
    }
}
