pub mod images;
pub mod upload;
