//! Unified error type for the clipsage library.
//!
//! Replaces scattered String-based error returns with a typed `AppError`
//! enum. Transient environmental failures (clipboard reads, persistence
//! writes) are logged and swallowed at their source; AI failures are
//! always surfaced to the invoking caller. Nothing here is fatal to the
//! process.

use std::fmt;

/// Unified application error type.
///
/// Variants are organized by domain: clipboard access, persistent
/// storage, configuration, and the AI provider layer.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Clipboard access errors (permission denied, empty, platform restriction)
    Clipboard(String),

    /// Persistence errors (serialization, file system, quota)
    Storage(String),

    /// Configuration errors (loading, parsing, migration)
    Config(String),

    /// No AI provider is configured or no model is selected
    AiUnavailable(String),

    /// An AI request failed: non-success response or transport failure
    AiRequest(String),

    /// Generic/internal errors that don't fit other categories
    Internal(String),
}

impl AppError {
    /// Create a clipboard error with a message.
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    /// Create a storage error with a message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a config error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-unavailable error with a message.
    pub fn ai_unavailable(msg: impl Into<String>) -> Self {
        Self::AiUnavailable(msg.into())
    }

    /// Create an AI request error with a message.
    pub fn ai_request(msg: impl Into<String>) -> Self {
        Self::AiRequest(msg.into())
    }

    /// Create an internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error message as a string slice.
    pub fn message(&self) -> &str {
        match self {
            AppError::Clipboard(msg) => msg,
            AppError::Storage(msg) => msg,
            AppError::Config(msg) => msg,
            AppError::AiUnavailable(msg) => msg,
            AppError::AiRequest(msg) => msg,
            AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::AiUnavailable(msg) => write!(f, "AI provider unavailable: {}", msg),
            AppError::AiRequest(msg) => write!(f, "AI request failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Convert from `anyhow::Error`, preserving the message chain.
///
/// Platform adapters (clipboard context, config paths) return
/// `anyhow::Result` internally; those failures surface here as
/// internal errors.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Convert from `std::io::Error`. I/O failures only arise in the
/// persistence layer, so they map to storage errors.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::storage(err.to_string())
    }
}

/// Convert from `serde_json::Error`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::storage(format!("JSON error: {}", err))
    }
}

/// Convert from `reqwest::Error`. Transport failures on AI calls are
/// surfaced as request errors carrying the underlying message.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ai_request(err.to_string())
    }
}

/// Type alias for Result with AppError.
pub type Result<T> = std::result::Result<T, AppError>;
