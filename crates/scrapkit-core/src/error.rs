//! Error types for the fallible edges of the engine.
//!
//! Editing operations never fail: misuse from the UI is a no-op. Only loading
//! and saving documents or configuration can produce an [`EditorError`].

use thiserror::Error;

/// Errors produced when crossing the engine boundary.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for engine boundary operations.
pub type EditorResult<T> = Result<T, EditorError>;
