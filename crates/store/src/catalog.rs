//! Catalog file persistence and directory scanning.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kiosk_core::error::CoreError;
use kiosk_core::record::ImageRecord;
use kiosk_core::types::ImageId;
use kiosk_core::upload::{is_allowed_image, title_from_filename};

/// Read the catalog file at `path`.
///
/// Returns `Ok(None)` when the file does not exist, so callers can tell a
/// fresh install apart from an unreadable catalog.
pub async fn read_catalog(path: &Path) -> Result<Option<Vec<ImageRecord>>, CoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let records = serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::Io(format!("Malformed catalog file {}: {e}", path.display()))
    })?;
    Ok(Some(records))
}

/// Write `records` to `path` as pretty-printed JSON.
///
/// The data goes to a sibling temp file first and is renamed into place, so
/// a crash mid-write leaves the previous catalog intact.
pub async fn write_catalog(path: &Path, records: &[ImageRecord]) -> Result<(), CoreError> {
    let json = serde_json::to_vec_pretty(records)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize catalog: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Rename the catalog at `path` to `<name>.corrupt-<stamp_millis>`.
///
/// Returns the new location, or `None` when there was no file to move.
pub async fn set_aside(path: &Path, stamp_millis: i64) -> Result<Option<PathBuf>, CoreError> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{stamp_millis}"));
    let target = path.with_file_name(name);

    match tokio::fs::rename(path, &target).await {
        Ok(()) => Ok(Some(target)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Build a catalog from the image files found directly inside `dir`.
///
/// Files are taken in name order; ids and `order` both count up from 1.
pub async fn scan_directory(dir: &Path) -> Result<Vec<ImageRecord>, CoreError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_allowed_image(&name) {
            continue;
        }
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        files.push((name, entry.path(), metadata.len(), modified));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    let records = files
        .into_iter()
        .enumerate()
        .map(|(index, (name, path, size, modified))| {
            let seq = index as ImageId + 1;
            ImageRecord {
                id: seq,
                title: title_from_filename(&name),
                original_name: name.clone(),
                filename: name,
                storage_path: path.to_string_lossy().into_owned(),
                size_bytes: size,
                uploaded_at: modified,
                updated_at: None,
                description: String::new(),
                order: seq,
                active: true,
            }
        })
        .collect();

    Ok(records)
}
