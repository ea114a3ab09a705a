//! The embedding index: one vector per knowledge record, searched by cosine
//! similarity.
//!
//! An index is immutable once built. When the knowledge base changes, build a
//! new index and swap it in; there is no incremental update.

use std::collections::BTreeMap;
use std::sync::Arc;

use campusbuddy_core::embedding::Embedder;
use campusbuddy_core::error::IndexError;
use campusbuddy_core::record::{Category, KnowledgeRecord};
use campusbuddy_core::store::KnowledgeStore;
use tracing::{debug, info};

use crate::vector::rank_by_similarity;

/// Matches below this similarity are noise; callers fall back instead.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// One indexed record.
#[derive(Debug, Clone)]
pub struct EmbeddingEntry {
    pub vector: Vec<f32>,
    pub category: Category,
    pub record: Arc<KnowledgeRecord>,
    /// The text the vector was computed from
    pub searchable_text: String,
}

/// A search hit.
#[derive(Debug, Clone)]
pub struct Match {
    pub category: Category,
    pub record: Arc<KnowledgeRecord>,
    pub similarity: f32,
}

pub struct EmbeddingIndex {
    entries: Vec<EmbeddingEntry>,
    dimensions: usize,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("entries", &self.entries.len())
            .field("dimensions", &self.dimensions)
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

impl EmbeddingIndex {
    /// Encode every record and freeze the result.
    ///
    /// Fails on an empty record set, on any record the embedder cannot
    /// encode, and on vectors whose width differs from the embedder's
    /// declared dimension. Entries keep the input order.
    pub fn build(
        records: Vec<KnowledgeRecord>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, IndexError> {
        if records.is_empty() {
            return Err(IndexError::EmptyKnowledgeBase);
        }

        let dimensions = embedder.dimensions();
        let mut entries = Vec::with_capacity(records.len());

        for (position, record) in records.into_iter().enumerate() {
            let searchable_text = record.searchable_text();
            let vector = embedder
                .encode(&searchable_text)
                .map_err(|e| IndexError::Build {
                    reason: format!("record #{position} '{}': {e}", record.title()),
                })?;

            if vector.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }

            entries.push(EmbeddingEntry {
                vector,
                category: record.category(),
                record: Arc::new(record),
                searchable_text,
            });
        }

        info!(
            records = entries.len(),
            dimensions,
            embedder = embedder.name(),
            "Built embedding index"
        );

        Ok(Self {
            entries,
            dimensions,
            embedder,
        })
    }

    /// List the store's records and build from them.
    pub fn from_store(
        store: &dyn KnowledgeStore,
        embedder: Arc<dyn Embedder>,
    ) -> campusbuddy_core::Result<Self> {
        let records = store.list_records()?;
        Ok(Self::build(records, embedder)?)
    }

    /// Encode `query` and return up to `k` matches at or above `threshold`,
    /// most similar first.
    pub fn search(&self, query: &str, k: usize, threshold: f32) -> Result<Vec<Match>, IndexError> {
        let query_vector = self.embedder.encode(query)?;
        self.search_vector(&query_vector, k, threshold)
    }

    /// Search with an already-encoded query.
    pub fn search_vector(
        &self,
        query: &[f32],
        k: usize,
        threshold: f32,
    ) -> Result<Vec<Match>, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let vectors: Vec<&[f32]> = self.entries.iter().map(|e| e.vector.as_slice()).collect();
        let matches: Vec<Match> = rank_by_similarity(&vectors, query, k, threshold)
            .into_iter()
            .map(|(position, similarity)| {
                let entry = &self.entries[position];
                Match {
                    category: entry.category,
                    record: Arc::clone(&entry.record),
                    similarity,
                }
            })
            .collect();

        debug!(
            hits = matches.len(),
            top = matches.first().map(|m| m.similarity),
            "Index search"
        );
        Ok(matches)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn entries(&self) -> &[EmbeddingEntry] {
        &self.entries
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Number of indexed records per category.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.category).or_insert(0) += 1;
        }
        counts
    }
}
