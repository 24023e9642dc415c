use std::path::{Path, PathBuf};

use kiosk_core::thumbnail::{thumbnail_file_name, ThumbnailSpec};
use kiosk_core::upload::DEFAULT_MAX_UPLOAD_BYTES;

/// Filesystem layout and limits of an [`ImageStore`](crate::ImageStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the uploaded image files.
    pub images_dir: PathBuf,
    /// Directory holding generated thumbnails.
    pub thumbnails_dir: PathBuf,
    /// JSON catalog file (source of truth across restarts).
    pub catalog_path: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: u64,
    pub thumbnail: ThumbnailSpec,
}

impl StoreConfig {
    /// Layout rooted at `data_dir`: `images/`, `thumbnails/`, `images.json`.
    pub fn under(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            images_dir: data_dir.join("images"),
            thumbnails_dir: data_dir.join("thumbnails"),
            catalog_path: data_dir.join("images.json"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            thumbnail: ThumbnailSpec::default(),
        }
    }

    /// Location of the stored image `filename`.
    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    /// Location of the thumbnail for the stored image `filename`.
    pub fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.thumbnails_dir.join(thumbnail_file_name(filename))
    }
}
