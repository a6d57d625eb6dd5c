//! System clipboard adapter backed by clipboard-rs.

use anyhow::Result;
use async_trait::async_trait;
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use std::sync::{Arc, Mutex};
use tokio::task::spawn_blocking;

use super::{CapturedContent, SystemClipboardPort};

/// Cross-platform system clipboard.
///
/// The underlying context is blocking, so reads are pushed onto the
/// blocking thread pool.
pub struct SystemClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow::anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
        })
    }
}

#[async_trait]
impl SystemClipboardPort for SystemClipboard {
    async fn read(&self) -> Result<Option<CapturedContent>> {
        let inner = self.inner.clone();
        let result = spawn_blocking(move || {
            let guard = inner
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to lock clipboard: {}", e))?;

            // Image takes priority over text
            if guard.has(ContentFormat::Image) {
                if let Ok(image) = guard.get_image() {
                    let png = image
                        .to_png()
                        .map_err(|e| anyhow::anyhow!("Failed to convert image to PNG: {}", e))?;
                    return Ok(Some(CapturedContent::Image(png.get_bytes().to_vec())));
                }
            }

            if let Ok(text) = guard.get_text() {
                if !text.is_empty() {
                    return Ok(Some(CapturedContent::Text(text)));
                }
            }

            Ok::<Option<CapturedContent>, anyhow::Error>(None)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))??;

        Ok(result)
    }
}
