//! Handlers for the `/images` resource.
//!
//! Every successful mutation is followed by exactly one broadcast on the
//! display channel so connected slideshows converge without polling.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use kiosk_core::record::{ImagePatch, ImageRecord};
use kiosk_core::types::ImageId;

use crate::error::AppResult;
use crate::response::{ImageResponse, SuccessResponse};
use crate::state::AppState;
use crate::ws::{Channel, HubEvent};

/// GET /api/images
pub async fn list(State(state): State<AppState>) -> Json<Vec<ImageRecord>> {
    Json(state.store.list().await)
}

/// GET /api/images/{id}
///
/// A non-numeric id is a 400 with the usual error body.
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<ImageId>, PathRejection>,
) -> AppResult<Json<ImageRecord>> {
    let Path(id) = id?;
    let image = state.store.get(id).await?;
    Ok(Json(image))
}

/// PUT /api/images/{id}
///
/// Accepts a partial record; unknown fields or malformed JSON are a 400.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<ImageId>, PathRejection>,
    payload: Result<Json<ImagePatch>, JsonRejection>,
) -> AppResult<Json<ImageResponse>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    if patch.is_empty() {
        tracing::debug!(image_id = id, "Empty patch, only touching updatedAt");
    }

    let image = state.store.update(id, patch).await?;
    state
        .hub
        .broadcast(Channel::Display, &HubEvent::ImageUpdated { image: image.clone() })
        .await;

    Ok(Json(ImageResponse::ok(image)))
}

/// DELETE /api/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<ImageId>, PathRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(id) = id?;
    state.store.remove(id).await?;
    state
        .hub
        .broadcast(Channel::Display, &HubEvent::ImageDeleted { id })
        .await;

    Ok(Json(SuccessResponse::ok()))
}
