pub mod poller;
pub mod system;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

pub use poller::ClipboardPoller;
pub use system::SystemClipboard;

/// One clipboard observation. Image is preferred over text when both
/// representations are present; the port implementation enforces that
/// priority so a capture cycle sees at most one of them.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedContent {
    /// PNG-encoded image bytes
    Image(Vec<u8>),
    /// Plain clipboard text
    Text(String),
}

impl CapturedContent {
    /// Stable content hash used by the poller to skip re-reads of
    /// unchanged clipboard state between ticks.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            CapturedContent::Image(bytes) => {
                hasher.update(b"image:");
                hasher.update(bytes);
            }
            CapturedContent::Text(text) => {
                hasher.update(b"text:");
                hasher.update(text.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Read access to the system clipboard.
///
/// The production implementation wraps the platform clipboard context;
/// tests substitute scripted fakes.
#[async_trait]
pub trait SystemClipboardPort: Send + Sync {
    /// Read the current clipboard contents, image first, then
    /// non-empty text. `None` when the clipboard holds neither.
    async fn read(&self) -> anyhow::Result<Option<CapturedContent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_distinguishes_kind() {
        let as_text = CapturedContent::Text("abc".to_string());
        let as_image = CapturedContent::Image(b"abc".to_vec());
        assert_ne!(as_text.content_hash(), as_image.content_hash());
    }

    #[test]
    fn test_hash_is_stable() {
        let a = CapturedContent::Text("same".to_string());
        let b = CapturedContent::Text("same".to_string());
        assert_eq!(a.content_hash(), b.content_hash());
    }
}
