//! Semantic retrieval over campus knowledge records.
//!
//! - [`vector`]: cosine similarity and thresholded top-k ranking
//! - [`embedder`]: offline feature-hashing embedder (the default)
//! - [`ollama`]: embedder backed by an Ollama embedding endpoint
//! - [`index`]: the immutable [`EmbeddingIndex`]
//! - [`shared`]: the process-wide embedder instance
//! - [`store`]: JSON dataset loading

pub mod embedder;
pub mod index;
pub mod ollama;
pub mod shared;
pub mod store;
pub mod vector;

pub use embedder::HashingEmbedder;
pub use index::{DEFAULT_THRESHOLD, EmbeddingEntry, EmbeddingIndex, Match};
pub use ollama::OllamaEmbedder;
pub use shared::{install_shared_embedder, shared_embedder};
pub use store::JsonFileStore;
pub use vector::{cosine_similarity, rank_by_similarity};
