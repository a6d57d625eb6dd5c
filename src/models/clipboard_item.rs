use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::content_type::ContentType;

/// Placeholder content stored for image captures; the actual payload
/// lives in `image_data`.
pub const IMAGE_PLACEHOLDER: &str = "Image from clipboard";

/// A single captured clipboard entry.
///
/// `content_type` is decided once at capture. `summary` and
/// `translated` are absent until an AI operation first sets them, and
/// are independent of each other. `image_data` (a PNG data URI) is
/// present exactly when `content_type` is image; the constructors
/// enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardItem {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Capture time in Unix milliseconds. Insertion order in the
    /// history is non-decreasing in this field.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(rename = "imageData", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl ClipboardItem {
    /// Create a textual item (text, code or link).
    pub fn new_text(content: impl Into<String>, content_type: ContentType) -> Self {
        debug_assert!(!content_type.is_image());
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            content_type,
            timestamp: Utc::now().timestamp_millis(),
            summary: None,
            translated: None,
            image_data: None,
        }
    }

    /// Create an image item from an encoded data URI.
    pub fn new_image(image_data: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: IMAGE_PLACEHOLDER.to_string(),
            content_type: ContentType::Image,
            timestamp: Utc::now().timestamp_millis(),
            summary: None,
            translated: None,
            image_data: Some(image_data.into()),
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.is_image()
    }

    /// Copy of this item with `summary` replaced. All other fields,
    /// `content` included, are untouched.
    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..self.clone()
        }
    }

    /// Copy of this item with `translated` replaced.
    pub fn with_translation(&self, translated: impl Into<String>) -> Self {
        Self {
            translated: Some(translated.into()),
            ..self.clone()
        }
    }

    /// Copy of this item with `content` replaced. Used only by code
    /// formatting; `summary` and `translated` are untouched.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_item_never_carries_image_data() {
        let item = ClipboardItem::new_text("hello", ContentType::Text);
        assert!(item.image_data.is_none());
        assert!(!item.is_image());
    }

    #[test]
    fn test_image_item_has_placeholder_content() {
        let item = ClipboardItem::new_image("data:image/png;base64,AAAA");
        assert_eq!(item.content, IMAGE_PLACEHOLDER);
        assert!(item.is_image());
        assert!(item.image_data.is_some());
    }

    #[test]
    fn test_with_summary_leaves_content_untouched() {
        let item = ClipboardItem::new_text("original", ContentType::Text);
        let summarized = item.with_summary("short");
        assert_eq!(summarized.content, "original");
        assert_eq!(summarized.summary.as_deref(), Some("short"));
        assert_eq!(summarized.id, item.id);
        assert!(summarized.translated.is_none());
    }

    #[test]
    fn test_serde_field_names_match_persisted_schema() {
        let item = ClipboardItem::new_image("data:image/png;base64,AAAA");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("imageData").is_some());
        assert!(json.get("summary").is_none());

        let back: ClipboardItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
