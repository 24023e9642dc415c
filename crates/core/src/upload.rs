//! Upload validation and file naming.

use std::path::Path;

use crate::error::CoreError;

/// File extensions accepted as slideshow images (lowercase, without dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Return the lowercase extension of `filename` if it is allow-listed.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Whether `filename` carries an allow-listed image extension.
pub fn is_allowed_image(filename: &str) -> bool {
    allowed_extension(filename).is_some()
}

/// Validate the extension of an uploaded file and return it lowercased.
pub fn validate_extension(filename: &str) -> Result<String, CoreError> {
    allowed_extension(filename).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unsupported file type '{filename}'. Allowed extensions: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    })
}

/// Fail when `size` exceeds `max_bytes`.
pub fn validate_size(size: u64, max_bytes: u64) -> Result<(), CoreError> {
    if size > max_bytes {
        Err(CoreError::Validation(format!(
            "File too large: {size} bytes exceeds the {max_bytes} byte limit"
        )))
    } else {
        Ok(())
    }
}

/// Title shown for an image: the file name without directory or extension.
pub fn title_from_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

/// Name under which an upload is stored: `<millis>-<suffix>.<ext>`.
///
/// The uploader's name never reaches the filesystem, so path separators or
/// `..` in it are harmless.
pub fn stored_file_name(stamp_millis: i64, suffix: &str, ext: &str) -> String {
    format!("{stamp_millis}-{suffix}.{ext}")
}
