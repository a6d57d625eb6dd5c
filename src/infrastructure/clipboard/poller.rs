//! Timer-driven clipboard capture.
//!
//! The poller is a two-state machine (idle / monitoring) with an
//! orthogonal focus flag fed by the embedding UI's window focus
//! events. While monitoring and focused it runs one capture cycle per
//! second; while unfocused, cycles are suspended entirely (no
//! clipboard I/O) and missed cycles are not replayed on refocus.
//! Per-cycle failures are logged and the next tick retries on the
//! same fixed cadence. Stopping only prevents new cycles; an in-flight
//! cycle runs to completion.

use base64::Engine;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::core::content_detector::detect_content_type;
use crate::core::content_type::ContentType;
use crate::error::{AppError, Result};
use crate::infrastructure::clipboard::{CapturedContent, SystemClipboardPort};
use crate::infrastructure::storage::HistoryManager;
use crate::models::ClipboardItem;

/// Fixed wall-clock capture cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct ClipboardPoller {
    clipboard: Arc<dyn SystemClipboardPort>,
    history: Arc<HistoryManager>,
    is_running: Arc<AtomicBool>,
    has_focus: Arc<AtomicBool>,
    /// Hash of the last observed clipboard payload, tagged with the
    /// history revision it was seen at. Identical consecutive reads
    /// are skipped only while the history is unchanged; any mutation
    /// (remove, clear, eviction) invalidates the skip so deleted
    /// content is recaptured on the next cycle.
    last_hash: Mutex<Option<(u64, String)>>,
}

impl ClipboardPoller {
    pub fn new(clipboard: Arc<dyn SystemClipboardPort>, history: Arc<HistoryManager>) -> Self {
        Self {
            clipboard,
            history,
            is_running: Arc::new(AtomicBool::new(false)),
            // The embedding UI reports focus changes; until it does,
            // assume focused so standalone use still captures.
            has_focus: Arc::new(AtomicBool::new(true)),
            last_hash: Mutex::new(None),
        }
    }

    /// Transition idle -> monitoring and spawn the capture loop.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::internal("Clipboard poller already running"));
        }

        info!("Clipboard monitoring started");
        let poller = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !poller.is_running.load(Ordering::SeqCst) {
                    break;
                }
                if !poller.has_focus.load(Ordering::SeqCst) {
                    // Suspended: no clipboard I/O while unfocused.
                    continue;
                }
                if let Err(e) = poller.check_once().await {
                    error!("Capture cycle failed: {}", e);
                }
            }
            info!("Clipboard monitoring loop exited");
        });

        Ok(())
    }

    /// Transition monitoring -> idle. An in-flight cycle is not
    /// cancelled.
    pub fn stop(&self) {
        if self
            .is_running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Clipboard monitoring stopped");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Focus flag, driven by the embedding UI's window focus events.
    pub fn set_focused(&self, focused: bool) {
        self.has_focus.store(focused, Ordering::SeqCst);
        debug!("Window focus changed: {}", focused);
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus.load(Ordering::SeqCst)
    }

    /// Run one capture cycle.
    ///
    /// Idempotent for unchanged clipboard state, and adds at most one
    /// item: an image when one is present, otherwise classified text.
    pub async fn check_once(&self) -> Result<()> {
        let content = self
            .clipboard
            .read()
            .await
            .map_err(|e| AppError::clipboard(format!("{:#}", e)))?;

        let Some(content) = content else {
            return Ok(());
        };

        // Skip identical consecutive reads cheaply, but only while the
        // history has not changed since the payload was last seen; the
        // history manager remains the authoritative deduplicator.
        let hash = content.content_hash();
        let revision = self.history.revision();
        {
            let mut last = self.last_hash.lock().await;
            if let Some((seen_revision, seen_hash)) = last.as_ref() {
                if *seen_revision == revision && *seen_hash == hash {
                    return Ok(());
                }
            }
            *last = Some((revision, hash));
        }

        match content {
            CapturedContent::Image(png) => {
                let data_uri = format!(
                    "data:image/png;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(&png)
                );
                if self.history.add(ClipboardItem::new_image(data_uri)).await {
                    info!("Captured image from clipboard ({} bytes)", png.len());
                }
            }
            CapturedContent::Text(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                let content_type = detect_content_type(&text);
                // A pasted data URI is an encoded image payload; keep
                // it in image_data so image dedup applies to it.
                let item = if content_type == ContentType::Image {
                    ClipboardItem::new_image(text)
                } else {
                    ClipboardItem::new_text(text, content_type)
                };
                if self.history.add(item).await {
                    info!("Captured {} item from clipboard", content_type);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::PersistentStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tempfile::tempdir;

    /// Scripted clipboard: returns a fixed value and counts reads.
    struct FakeClipboard {
        value: std::sync::Mutex<Option<CapturedContent>>,
        reads: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeClipboard {
        fn with_text(text: &str) -> Self {
            Self {
                value: std::sync::Mutex::new(Some(CapturedContent::Text(text.to_string()))),
                reads: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }

        fn set_text(&self, text: &str) {
            *self.value.lock().unwrap() = Some(CapturedContent::Text(text.to_string()));
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SystemClipboardPort for FakeClipboard {
        async fn read(&self) -> anyhow::Result<Option<CapturedContent>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("clipboard permission denied");
            }
            Ok(self.value.lock().unwrap().clone())
        }
    }

    fn new_history(dir: &std::path::Path) -> Arc<HistoryManager> {
        Arc::new(HistoryManager::new(
            PersistentStore::new(dir).unwrap(),
            1000,
        ))
    }

    #[tokio::test]
    async fn test_capture_cycle_classifies_link() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("https://example.com"));
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();

        let items = history.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content_type, ContentType::Link);
        assert_eq!(items[0].content, "https://example.com");
    }

    #[tokio::test]
    async fn test_repeated_cycles_add_one_item() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("https://example.com"));
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();
        poller.check_once().await.unwrap();
        poller.check_once().await.unwrap();

        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn test_image_takes_priority_and_becomes_data_uri() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard {
            value: std::sync::Mutex::new(Some(CapturedContent::Image(vec![1, 2, 3]))),
            reads: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        });
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();

        let items = history.items().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_image());
        let data = items[0].image_data.as_deref().unwrap();
        assert!(data.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_removed_item_is_recaptured_on_next_cycle() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("keep this"));
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();
        let id = history.items().await[0].id.clone();
        history.remove(&id).await;

        // The clipboard still holds the same payload; with its history
        // entry gone it is no longer a duplicate.
        poller.check_once().await.unwrap();
        let items = history.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "keep this");
    }

    #[tokio::test]
    async fn test_clear_allows_recapture_of_current_clipboard() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("survivor"));
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();
        history.clear().await;

        poller.check_once().await.unwrap();
        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_surfaced_but_not_fatal() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("ok"));
        clipboard.fail.store(true, Ordering::SeqCst);
        let poller = ClipboardPoller::new(clipboard.clone(), history.clone());

        let err = poller.check_once().await.unwrap_err();
        assert!(matches!(err, AppError::Clipboard(_)));
        assert!(history.is_empty().await);

        // Next cycle succeeds independently.
        clipboard.fail.store(false, Ordering::SeqCst);
        poller.check_once().await.unwrap();
        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn test_pasted_data_uri_text_is_stored_as_image() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("data:image/png;base64,AAAA"));
        let poller = ClipboardPoller::new(clipboard, history.clone());

        poller.check_once().await.unwrap();

        let items = history.items().await;
        assert!(items[0].is_image());
        assert_eq!(items[0].image_data.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitoring_loop_polls_and_suspends_on_blur() {
        let dir = tempdir().unwrap();
        let history = new_history(dir.path());
        let clipboard = Arc::new(FakeClipboard::with_text("first"));
        let poller = Arc::new(ClipboardPoller::new(clipboard.clone(), history.clone()));

        poller.start().unwrap();
        assert!(poller.is_monitoring());
        // Starting twice is rejected while monitoring.
        assert!(poller.start().is_err());

        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(history.len().await, 1);

        // Blur: polling suspends entirely, no clipboard I/O.
        poller.set_focused(false);
        tokio::time::sleep(POLL_INTERVAL).await;
        let reads_while_blurred = clipboard.read_count();
        clipboard.set_text("second");
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(clipboard.read_count(), reads_while_blurred);
        assert_eq!(history.len().await, 1);

        // Refocus resumes polling without replaying missed cycles.
        poller.set_focused(true);
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert_eq!(history.len().await, 2);

        poller.stop();
        assert!(!poller.is_monitoring());
        clipboard.set_text("third");
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(history.len().await, 2);
    }
}
