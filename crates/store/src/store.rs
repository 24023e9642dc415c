use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use kiosk_core::error::CoreError;
use kiosk_core::record::{ImagePatch, ImageRecord, NewImage};
use kiosk_core::thumbnail::generate_thumbnail;
use kiosk_core::types::ImageId;
use tokio::sync::RwLock;

use crate::catalog;
use crate::config::StoreConfig;

/// Entity name used in `NotFound` errors.
const ENTITY: &str = "Image";

/// The authoritative, ordered slideshow catalog.
///
/// Every mutation runs under the write lock and is persisted to the catalog
/// file before the lock is released. If persisting fails the in-memory list
/// is rolled back, so memory and disk never diverge.
pub struct ImageStore {
    config: StoreConfig,
    images: RwLock<Vec<ImageRecord>>,
}

impl ImageStore {
    /// Create the store directories and load the catalog.
    ///
    /// Only directory creation can fail; an unreadable catalog degrades to
    /// an empty one (see [`ImageStore::load`]).
    pub async fn open(config: StoreConfig) -> Result<Self, CoreError> {
        tokio::fs::create_dir_all(&config.images_dir).await?;
        tokio::fs::create_dir_all(&config.thumbnails_dir).await?;

        let store = Self {
            config,
            images: RwLock::new(Vec::new()),
        };
        store.load().await;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Replace the in-memory list with the catalog file contents.
    ///
    /// Without a catalog file the image directory is scanned instead and the
    /// result written out as the new catalog. Read failures are logged and
    /// yield an empty catalog; an unreadable catalog file is first renamed to
    /// `<name>.corrupt-<millis>` so later writes cannot overwrite it.
    /// Returns the number of records loaded.
    pub async fn load(&self) -> usize {
        let records = match catalog::read_catalog(&self.config.catalog_path).await {
            Ok(Some(records)) => {
                tracing::info!(
                    path = %self.config.catalog_path.display(),
                    count = records.len(),
                    "Loaded image catalog"
                );
                records
            }
            Ok(None) => self.scan_images_dir().await,
            Err(e) => {
                tracing::warn!(
                    path = %self.config.catalog_path.display(),
                    error = %e,
                    "Failed to read image catalog, starting with an empty catalog"
                );
                self.set_aside_unreadable_catalog().await;
                Vec::new()
            }
        };

        let count = records.len();
        *self.images.write().await = records;
        count
    }

    /// Move an unreadable catalog out of the way so the next write does not
    /// replace it.
    async fn set_aside_unreadable_catalog(&self) {
        let path = &self.config.catalog_path;
        match catalog::set_aside(path, Utc::now().timestamp_millis()).await {
            Ok(Some(moved_to)) => {
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %moved_to.display(),
                    "Moved unreadable catalog aside"
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to move unreadable catalog aside"
                );
            }
        }
    }

    async fn scan_images_dir(&self) -> Vec<ImageRecord> {
        let records = match catalog::scan_directory(&self.config.images_dir).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    dir = %self.config.images_dir.display(),
                    error = %e,
                    "Failed to scan image directory, starting with an empty catalog"
                );
                return Vec::new();
            }
        };

        tracing::info!(
            dir = %self.config.images_dir.display(),
            count = records.len(),
            "No catalog file found, built catalog from image directory"
        );

        if !records.is_empty() {
            if let Err(e) = catalog::write_catalog(&self.config.catalog_path, &records).await {
                tracing::warn!(error = %e, "Failed to write scanned catalog");
            }
        }
        records
    }

    /// Write the current catalog to disk.
    pub async fn save(&self) -> Result<(), CoreError> {
        let images = self.images.read().await;
        catalog::write_catalog(&self.config.catalog_path, &images).await
    }

    /// Snapshot of the full catalog in display order of insertion.
    pub async fn list(&self) -> Vec<ImageRecord> {
        self.images.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }

    pub async fn get(&self, id: ImageId) -> Result<ImageRecord, CoreError> {
        self.images
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Append a record for an upload that is already on disk.
    ///
    /// The thumbnail is generated after the record is stored; a thumbnail
    /// failure is logged and does not affect the result.
    pub async fn add(&self, upload: NewImage) -> Result<ImageRecord, CoreError> {
        let record = {
            let mut images = self.images.write().await;
            let now = Utc::now();
            let id = next_id(&images, now.timestamp_millis());
            let order = images.iter().map(|r| r.order).max().unwrap_or(0).saturating_add(1);
            let record = ImageRecord::from_upload(id, order, upload, now);

            images.push(record.clone());
            if let Err(e) = catalog::write_catalog(&self.config.catalog_path, &images).await {
                images.pop();
                return Err(e);
            }
            record
        };

        tracing::info!(image_id = record.id, filename = %record.filename, "Image added");
        self.generate_thumbnail(&record.filename).await;
        Ok(record)
    }

    /// Merge `patch` over the record with `id` and stamp `updated_at`.
    pub async fn update(&self, id: ImageId, patch: ImagePatch) -> Result<ImageRecord, CoreError> {
        let mut images = self.images.write().await;
        let record = images
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        let previous = record.clone();
        record.apply(patch, Utc::now());
        let updated = record.clone();

        if let Err(e) = catalog::write_catalog(&self.config.catalog_path, &images).await {
            if let Some(slot) = images.iter_mut().find(|r| r.id == id) {
                *slot = previous;
            }
            return Err(e);
        }

        tracing::info!(image_id = id, "Image updated");
        Ok(updated)
    }

    /// Remove the record with `id` along with its image and thumbnail files.
    ///
    /// Missing files are not an error. Returns the removed record.
    pub async fn remove(&self, id: ImageId) -> Result<ImageRecord, CoreError> {
        let removed = {
            let mut images = self.images.write().await;
            let index = images
                .iter()
                .position(|r| r.id == id)
                .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

            let removed = images.remove(index);
            if let Err(e) = catalog::write_catalog(&self.config.catalog_path, &images).await {
                images.insert(index, removed);
                return Err(e);
            }
            removed
        };

        remove_file_if_exists(&self.config.image_path(&removed.filename)).await;
        remove_file_if_exists(&self.config.thumbnail_path(&removed.filename)).await;

        tracing::info!(image_id = id, filename = %removed.filename, "Image removed");
        Ok(removed)
    }

    /// Render the thumbnail for the stored image `filename`.
    ///
    /// Returns whether a thumbnail was written. Failures are logged only.
    /// If the record was removed while rendering, the fresh thumbnail is
    /// deleted again and `false` is returned.
    pub async fn generate_thumbnail(&self, filename: &str) -> bool {
        let source = self.config.image_path(filename);
        let dest = self.config.thumbnail_path(filename);
        let spec = self.config.thumbnail;

        let result =
            tokio::task::spawn_blocking(move || generate_thumbnail(&source, &dest, spec)).await;

        match result {
            Ok(Ok(())) => {
                if !self.contains_file(filename).await {
                    remove_file_if_exists(&self.config.thumbnail_path(filename)).await;
                    tracing::debug!(filename, "Image removed while rendering, thumbnail discarded");
                    return false;
                }
                tracing::debug!(filename, "Thumbnail generated");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(filename, error = %e, "Thumbnail generation failed");
                false
            }
            Err(e) => {
                tracing::error!(filename, error = %e, "Thumbnail task panicked");
                false
            }
        }
    }

    async fn contains_file(&self, filename: &str) -> bool {
        self.images.read().await.iter().any(|r| r.filename == filename)
    }

    /// Generate thumbnails for records whose thumbnail file is missing.
    ///
    /// Returns how many thumbnails were written.
    pub async fn backfill_thumbnails(&self) -> usize {
        let missing: Vec<String> = self
            .list()
            .await
            .into_iter()
            .map(|r| r.filename)
            .filter(|f| !self.config.thumbnail_path(f).exists())
            .collect();

        let mut generated = 0;
        for filename in &missing {
            if self.generate_thumbnail(filename).await {
                generated += 1;
            }
        }

        if !missing.is_empty() {
            tracing::info!(missing = missing.len(), generated, "Thumbnail backfill finished");
        }
        generated
    }
}

/// Pick an id for a new record: the current time in milliseconds, bumped
/// past the largest existing id when needed so ids stay unique.
fn next_id(images: &[ImageRecord], now_millis: i64) -> ImageId {
    let max = images.iter().map(|r| r.id).max().unwrap_or(0);
    now_millis.max(max.saturating_add(1))
}

async fn remove_file_if_exists(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
        }
    }
}
