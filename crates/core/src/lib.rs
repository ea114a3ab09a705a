//! # CampusBuddy Core
//!
//! Domain types, traits, and error definitions for the CampusBuddy campus
//! assistant. This crate performs no I/O; it defines the domain model that
//! the index, agent, and CLI crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external capability is a trait here:
//! - [`Embedder`] turns text into a dense vector
//! - [`KnowledgeStore`] lists the immutable knowledge records
//! - [`RandomSource`] is the single seam for intentional variety in replies
//!
//! Implementations live in their respective crates, so tests can swap in
//! deterministic stand-ins without touching the engine.

pub mod embedding;
pub mod error;
pub mod message;
pub mod random;
pub mod record;
pub mod store;
pub mod tone;

// Re-export key types at crate root for ergonomics
pub use embedding::Embedder;
pub use error::{EmbeddingError, Error, IndexError, Result, StoreError};
pub use message::{Role, Turn};
pub use random::RandomSource;
pub use record::{
    Category, Course, Dining, Event, Facility, Housing, KnowledgeBase, KnowledgeRecord, News,
    Organization, Professor,
};
pub use store::{KnowledgeStore, StaticStore};
pub use tone::{Tone, ToneScores};
