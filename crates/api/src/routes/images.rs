use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{images, upload};
use crate::state::AppState;

/// Catalog routes.
///
/// ```text
/// GET     /images          list
/// GET     /images/{id}     get
/// PUT     /images/{id}     update
/// DELETE  /images/{id}     delete
/// POST    /upload          multipart upload (field `image`)
/// ```
pub fn router(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = max_upload_bytes.saturating_add(upload::MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    Router::new()
        .route("/images", get(images::list))
        .route(
            "/images/{id}",
            get(images::get_by_id)
                .put(images::update)
                .delete(images::delete),
        )
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(body_limit)),
        )
}
