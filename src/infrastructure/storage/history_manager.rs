//! Bounded clipboard history.
//!
//! The manager is the single writer for the item list: deduplication
//! and every mutation happen inside one write-lock critical section,
//! so a capture cycle and a concurrent AI update can never lose each
//! other's writes through an independent read-modify-write. The list
//! is persisted after every mutation and restored on construction.

use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::infrastructure::storage::persistent_store::PersistentStore;
use crate::models::ClipboardItem;

const HISTORY_KEY: &str = "clipboard-history";

/// Default hard cap on retained items. Oldest entries are evicted
/// first; this is a cap, not an LRU.
pub const DEFAULT_MAX_ITEMS: usize = 1000;

pub struct HistoryManager {
    items: RwLock<Vec<ClipboardItem>>,
    store: PersistentStore,
    max_items: usize,
    /// Bumped on every mutation that changes the list. Observers that
    /// cache state derived from the list contents use this to detect
    /// that their cache went stale.
    revision: AtomicU64,
}

impl HistoryManager {
    /// Create a manager backed by the given store, restoring any
    /// previously persisted history.
    pub fn new(store: PersistentStore, max_items: usize) -> Self {
        let restored: Vec<ClipboardItem> = store.get(HISTORY_KEY, Vec::new());
        if !restored.is_empty() {
            info!("Restored {} clipboard history items", restored.len());
        }
        Self {
            items: RwLock::new(restored),
            store,
            max_items,
            revision: AtomicU64::new(0),
        }
    }

    /// Monotonic mutation counter. Two equal readings bracket a span
    /// in which the list contents did not change.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Add an item to the front of the history.
    ///
    /// Duplicates are silently dropped: a non-image item whose content
    /// matches any existing non-image item, or an image item whose
    /// encoded payload matches any existing image item. Returns whether
    /// the item was actually inserted. The list is truncated to the cap
    /// after insertion, evicting the oldest entries.
    pub async fn add(&self, item: ClipboardItem) -> bool {
        let mut items = self.items.write().await;

        let duplicate = if item.is_image() {
            items
                .iter()
                .any(|existing| existing.is_image() && existing.image_data == item.image_data)
        } else {
            items
                .iter()
                .any(|existing| !existing.is_image() && existing.content == item.content)
        };
        if duplicate {
            debug!("Dropping duplicate {} item", item.content_type);
            return false;
        }

        items.insert(0, item);
        items.truncate(self.max_items);
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.store.set(HISTORY_KEY, &*items);
        true
    }

    /// Replace the entry whose id matches. Silently a no-op when no
    /// entry matches.
    pub async fn update(&self, item: ClipboardItem) {
        let mut items = self.items.write().await;
        if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
            *existing = item;
            self.revision.fetch_add(1, Ordering::SeqCst);
            self.store.set(HISTORY_KEY, &*items);
        } else {
            debug!("update: no history entry with id {}", item.id);
        }
    }

    /// Delete the entry with the given id. Idempotent when absent.
    pub async fn remove(&self, id: &str) {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() != before {
            self.revision.fetch_add(1, Ordering::SeqCst);
            self.store.set(HISTORY_KEY, &*items);
        }
    }

    /// Reset the history to empty.
    pub async fn clear(&self) {
        let mut items = self.items.write().await;
        items.clear();
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.store.set(HISTORY_KEY, &*items);
        info!("Clipboard history cleared");
    }

    /// Case-insensitive substring filter over item content. Returns a
    /// fresh filtered view preserving list order; does not mutate.
    pub async fn search(&self, term: &str) -> Vec<ClipboardItem> {
        let needle = term.to_lowercase();
        let items = self.items.read().await;
        items
            .iter()
            .filter(|item| item.content.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Snapshot of the current history, newest first.
    pub async fn items(&self) -> Vec<ClipboardItem> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}
