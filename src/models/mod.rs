pub mod image;
pub mod session;

pub use image::{is_supported_image_type, DataUri, UploadedImage, SUPPORTED_IMAGE_TYPES};
pub use session::{ChatRole, ChatSession, ChatTurn};
