//! Error types for the CampusBuddy domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all CampusBuddy operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Embedding errors ---
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    // --- Knowledge store errors ---
    #[error("Knowledge store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the embedding index, at build time or query time.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The knowledge base handed to the builder had no records.
    #[error("Cannot build index: knowledge base is empty")]
    EmptyKnowledgeBase,

    /// Encoding a record failed, so the build was aborted.
    #[error("Index build failed: {reason}")]
    Build { reason: String },

    /// The embedder produced a vector of a different width than the index holds.
    #[error("Embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Encoding the query failed.
    #[error("Query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl IndexError {
    /// Whether this error means the embedder itself is misconfigured.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }
}

#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Embedding request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedder not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read knowledge file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse knowledge file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}
