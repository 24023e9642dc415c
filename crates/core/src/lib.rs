//! Domain types and pure logic for the kiosk slideshow server.
//!
//! Nothing in here touches the network or owns shared state; the store and
//! API crates build on these types.

pub mod error;
pub mod record;
pub mod thumbnail;
pub mod types;
pub mod upload;
