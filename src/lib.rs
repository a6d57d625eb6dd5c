//! clipsage
//!
//! AI-assisted clipboard history library: a polling clipboard capture
//! pipeline, a bounded persisted history of captured items, and AI
//! transformations (summarize, translate, format) over a pluggable
//! local or hosted model backend.

pub mod config;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod models;

// Re-export the common types
pub use config::{ProviderKind, Settings, SETTINGS};
pub use crate::core::content_detector::detect_content_type;
pub use crate::core::content_type::ContentType;
pub use error::{AppError, Result};
pub use infrastructure::ai::{
    AiProcessor, AiProvider, GenerateOptions, HostedProvider, LocalProvider, ModelInfo,
};
pub use infrastructure::clipboard::{
    CapturedContent, ClipboardPoller, SystemClipboard, SystemClipboardPort,
};
pub use infrastructure::storage::{HistoryManager, PersistentStore};
pub use models::ClipboardItem;
