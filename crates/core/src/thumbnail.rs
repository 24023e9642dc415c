//! Thumbnail rendering.
//!
//! Thumbnails are JPEG files named `thumb_<stem>.jpg`. Rendering first tries
//! a centered "cover" crop to the exact target size and falls back once to
//! a non-cropping "fit inside" resize.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use crate::error::CoreError;

/// Default thumbnail width in pixels.
pub const DEFAULT_WIDTH: u32 = 300;

/// Default thumbnail height in pixels.
pub const DEFAULT_HEIGHT: u32 = 200;

/// Default JPEG quality (1-100).
pub const DEFAULT_QUALITY: u8 = 80;

/// Target dimensions and encoding quality for thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// How the source image is mapped onto the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Scale to fill the box, cropping the overflow around the center.
    Cover,
    /// Scale to fit entirely inside the box, preserving aspect ratio.
    Inside,
}

/// File name of the thumbnail belonging to the stored image `filename`.
pub fn thumbnail_file_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    format!("thumb_{stem}.jpg")
}

/// Render a thumbnail of `source` into `dest`, retrying once with
/// [`FitMode::Inside`] when the cover render fails.
///
/// Blocking: decodes and encodes on the calling thread.
pub fn generate_thumbnail(source: &Path, dest: &Path, spec: ThumbnailSpec) -> Result<(), CoreError> {
    match render_thumbnail(source, dest, spec, FitMode::Cover) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::warn!(
                source = %source.display(),
                error = %err,
                "Cover thumbnail failed, retrying with fit-inside resize"
            );
            render_thumbnail(source, dest, spec, FitMode::Inside)
        }
    }
}

/// Render a single thumbnail with the given fit mode.
pub fn render_thumbnail(
    source: &Path,
    dest: &Path,
    spec: ThumbnailSpec,
    mode: FitMode,
) -> Result<(), CoreError> {
    let img = decode(source)?;

    let resized = match mode {
        FitMode::Cover => img.resize_to_fill(spec.width, spec.height, FilterType::Lanczos3),
        FitMode::Inside => img.resize(spec.width, spec.height, FilterType::Lanczos3),
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(dest)?);
    let encoder = JpegEncoder::new_with_quality(writer, spec.quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| CoreError::Io(format!("Failed to encode {}: {e}", dest.display())))?;

    Ok(())
}

/// Decode `source`, detecting the format from its content so a PNG saved
/// as `.jpg` still decodes. The extension is only a fallback.
fn decode(source: &Path) -> Result<DynamicImage, CoreError> {
    ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| CoreError::Io(format!("Failed to decode {}: {e}", source.display())))
}
