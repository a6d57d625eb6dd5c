pub mod content_detector;
pub mod content_type;

pub use content_detector::detect_content_type;
pub use content_type::ContentType;
