//! The CampusBuddy conversation engine.
//!
//! Each turn flows through four parts:
//!
//! 1. **Tone Classifier** ([`tone`]) scores the utterance's register
//! 2. **Session Context Tracker** ([`session`]) records it, counts repeats,
//!    and picks up what the user said about themselves
//! 3. **Embedding Index** (the `campusbuddy-index` crate) finds matching records
//! 4. **Response Composer** ([`composer`]) renders the top match, or the
//!    fallback, in the user's register
//!
//! [`Assistant`] ties them together behind `respond(session_id, utterance)`.

pub mod assistant;
pub mod composer;
pub mod random;
pub mod session;
pub mod tone;

pub use assistant::{Assistant, AssistantOptions, embedder_from_config};
pub use composer::ResponseComposer;
pub use random::{FirstChoice, SeededRandom, ThreadRandom};
pub use session::SessionContext;
pub use tone::ToneClassifier;
