use std::path::PathBuf;
use std::str::FromStr;

use kiosk_core::thumbnail::{ThumbnailSpec, DEFAULT_HEIGHT, DEFAULT_QUALITY, DEFAULT_WIDTH};
use kiosk_core::upload::DEFAULT_MAX_UPLOAD_BYTES;
use kiosk_store::StoreConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a kiosk running from its install
/// directory. Override via environment variables or a `.env` file.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory with the display and control web UI (default: `public`).
    pub public_dir: PathBuf,
    /// Image store layout and limits.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PUBLIC_DIR`           | `public`                   |
    /// | `IMAGES_DIR`           | `data/images`              |
    /// | `THUMBNAILS_DIR`       | `data/thumbnails`          |
    /// | `CATALOG_PATH`         | `data/images.json`         |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `THUMBNAIL_WIDTH`      | `300`                      |
    /// | `THUMBNAIL_HEIGHT`     | `200`                      |
    /// | `THUMBNAIL_QUALITY`    | `80`                       |
    ///
    /// Panics on unparsable numeric values so misconfiguration fails at
    /// startup rather than on the first upload.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 30);
        let public_dir = path_var("PUBLIC_DIR", "public");

        let store = StoreConfig {
            images_dir: path_var("IMAGES_DIR", "data/images"),
            thumbnails_dir: path_var("THUMBNAILS_DIR", "data/thumbnails"),
            catalog_path: path_var("CATALOG_PATH", "data/images.json"),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            thumbnail: ThumbnailSpec {
                width: parse_var("THUMBNAIL_WIDTH", DEFAULT_WIDTH),
                height: parse_var("THUMBNAIL_HEIGHT", DEFAULT_HEIGHT),
                quality: parse_var("THUMBNAIL_QUALITY", DEFAULT_QUALITY),
            },
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_dir,
            store,
        }
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    std::env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid value, got '{raw}': {e}")),
        Err(_) => default,
    }
}
