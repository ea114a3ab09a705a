//! Embedder trait: text to dense vector.
//!
//! One embedder is used per process lifetime. Its dimension is fixed: an index
//! built with one width refuses queries encoded at another.

use crate::error::EmbeddingError;

/// Any text-to-vector model.
///
/// Implementations: feature hashing (default, offline), Ollama HTTP service.
/// Encoding is treated as an opaque synchronous call.
pub trait Embedder: Send + Sync {
    /// The embedder name (e.g., "hashing", "ollama").
    fn name(&self) -> &str;

    /// Width of every vector this embedder produces.
    fn dimensions(&self) -> usize;

    /// Encode one text.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
