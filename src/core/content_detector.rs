//! Content type detection for captured clipboard text.
//!
//! This is a deliberate substring heuristic, not a parser. Prose that
//! happens to contain the word "class" classifies as code; that is
//! accepted behavior. Tightening the heuristic would change the
//! observable classification of existing histories.

use crate::core::content_type::ContentType;

/// Detect the content type of a captured string.
///
/// Total and deterministic. Decision order, first match wins:
/// image data URI prefix, http(s) URL prefix, code markers, plain text.
pub fn detect_content_type(content: &str) -> ContentType {
    if content.starts_with("data:image/") {
        ContentType::Image
    } else if content.starts_with("http://") || content.starts_with("https://") {
        ContentType::Link
    } else if content.contains('{') || content.contains("function") || content.contains("class") {
        ContentType::Code
    } else {
        ContentType::Text
    }
}
