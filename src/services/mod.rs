pub mod image_cache;
pub mod providers;

pub use image_cache::{CachedImage, ImageCache};
