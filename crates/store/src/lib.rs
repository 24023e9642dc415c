//! Image Store: the authoritative slideshow catalog.
//!
//! [`ImageStore`] owns the ordered list of [`ImageRecord`]s, mirrors it to a
//! JSON catalog file and keeps a thumbnail next to every stored image. It is
//! designed to be shared as `Arc<ImageStore>`; each test builds its own.
//!
//! [`ImageRecord`]: kiosk_core::record::ImageRecord

pub mod catalog;
pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::ImageStore;
