use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Clipboard content type, decided once at capture time and never
/// re-derived afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Code,
    Link,
    Image,
}

impl ContentType {
    pub fn is_image(&self) -> bool {
        matches!(self, ContentType::Image)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Link => "link",
            ContentType::Image => "image",
        };
        write!(f, "{}", s)
    }
}

impl TryFrom<&str> for ContentType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "text" => Ok(ContentType::Text),
            "code" => Ok(ContentType::Code),
            "link" => Ok(ContentType::Link),
            "image" => Ok(ContentType::Image),
            _ => Err(format!("invalid content type: {}", s)),
        }
    }
}
