//! The caller-facing assistant: one utterance in, one reply out.
//!
//! A turn runs:
//!
//! 1. **Classify** the utterance's tone
//! 2. **Record** it in the session context (lazily created per session id)
//! 3. **Search** the current index snapshot
//! 4. **Compose** the reply and log it to the session
//!
//! [`Assistant::respond`] is total. Search failures (embedding errors,
//! dimension mismatches, a missing index) degrade to the fallback reply;
//! [`Assistant::try_respond`] reports them instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use campusbuddy_config::{AppConfig, EmbeddingConfig};
use campusbuddy_core::embedding::Embedder;
use campusbuddy_core::error::{EmbeddingError, Error, IndexError};
use campusbuddy_core::random::RandomSource;
use campusbuddy_core::store::KnowledgeStore;
use campusbuddy_index::{
    DEFAULT_THRESHOLD, EmbeddingIndex, HashingEmbedder, JsonFileStore, Match, OllamaEmbedder,
    install_shared_embedder, shared_embedder,
};
use tracing::{debug, error, info, warn};

use crate::composer::{DEFAULT_TRIVIA_PROBABILITY, ResponseComposer};
use crate::random::{SeededRandom, ThreadRandom};
use crate::session::{DEFAULT_MAX_RECENT_QUERIES, DEFAULT_MAX_TURNS, SessionContext};
use crate::tone::ToneClassifier;

/// Retrieval and session tuning.
#[derive(Debug, Clone)]
pub struct AssistantOptions {
    pub top_k: usize,
    pub min_similarity: f32,
    pub max_recent_queries: usize,
    pub max_turns: usize,
    /// Live sessions kept before the least recently used is dropped
    pub max_sessions: usize,
    pub trivia_probability: f64,
}

pub const DEFAULT_MAX_SESSIONS: usize = 1024;

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: DEFAULT_THRESHOLD,
            max_recent_queries: DEFAULT_MAX_RECENT_QUERIES,
            max_turns: DEFAULT_MAX_TURNS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            trivia_probability: DEFAULT_TRIVIA_PROBABILITY,
        }
    }
}

impl AssistantOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            top_k: config.retrieval.top_k,
            min_similarity: config.retrieval.min_similarity as f32,
            max_recent_queries: config.session.max_recent_queries,
            max_turns: config.session.max_turns,
            max_sessions: config.session.max_sessions,
            trivia_probability: config.composer.trivia_probability,
        }
    }
}

type SessionHandle = Arc<Mutex<SessionContext>>;

/// Live sessions with a logical clock for least-recently-used eviction.
#[derive(Default)]
struct SessionTable {
    entries: HashMap<String, (SessionHandle, u64)>,
    clock: u64,
}

impl SessionTable {
    fn touch(
        &mut self,
        session_id: &str,
        capacity: usize,
        create: impl FnOnce() -> SessionHandle,
    ) -> SessionHandle {
        self.clock += 1;
        if let Some((handle, last_used)) = self.entries.get_mut(session_id) {
            *last_used = self.clock;
            return Arc::clone(handle);
        }

        while self.entries.len() >= capacity.max(1) {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, (_, last_used))| *last_used)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(session = %oldest, "Evicted least recently used session");
        }

        let handle = create();
        self.entries
            .insert(session_id.to_string(), (Arc::clone(&handle), self.clock));
        handle
    }
}

pub struct Assistant {
    /// Current index; `None` means fallback-only mode
    index: RwLock<Option<Arc<EmbeddingIndex>>>,

    /// Embedder used for every build
    embedder: Arc<dyn Embedder>,

    classifier: ToneClassifier,

    composer: ResponseComposer,

    /// Live conversations by session id, bounded by `options.max_sessions`
    sessions: Mutex<SessionTable>,

    /// The composer's variety seam
    random: Mutex<Box<dyn RandomSource>>,

    options: AssistantOptions,
}

impl Assistant {
    /// Build the index from `store` and create an assistant around it.
    ///
    /// A failed build is logged and leaves the assistant in fallback-only
    /// mode: every reply is the generic-unknown response until a
    /// [`rebuild`](Self::rebuild) succeeds.
    pub fn new(
        store: &dyn KnowledgeStore,
        embedder: Arc<dyn Embedder>,
        options: AssistantOptions,
    ) -> Self {
        let index = match EmbeddingIndex::from_store(store, Arc::clone(&embedder)) {
            Ok(index) => Some(Arc::new(index)),
            Err(e) => {
                warn!("Index build failed, running in fallback-only mode: {e}");
                None
            }
        };

        Self {
            index: RwLock::new(index),
            embedder,
            classifier: ToneClassifier::new(),
            composer: ResponseComposer::new(options.trivia_probability),
            sessions: Mutex::new(SessionTable::default()),
            random: Mutex::new(Box::new(ThreadRandom)),
            options,
        }
    }

    /// Wire an assistant from configuration: the configured embedder (shared
    /// process-wide), the JSON dataset, and a seeded random source if a seed
    /// is set.
    pub fn from_config(config: &AppConfig) -> Self {
        let embedder = process_embedder(&config.embedding);
        let store = JsonFileStore::new(config.knowledge.resolved_path());
        let assistant = Self::new(&store, embedder, AssistantOptions::from_config(config));

        match config.composer.seed {
            Some(seed) => assistant.with_random(Box::new(SeededRandom::new(seed))),
            None => assistant,
        }
    }

    /// Replace the random source.
    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Mutex::new(random);
        self
    }

    /// Reply to `utterance` in session `session_id`. Never fails.
    pub fn respond(&self, session_id: &str, utterance: &str) -> String {
        let (reply, failure) = self.run_turn(session_id, utterance);
        if let Some(e) = failure {
            if e.is_fatal() {
                error!(session = session_id, "Search failed, embedder misconfigured: {e}");
            } else {
                warn!(session = session_id, "Search failed, replying with fallback: {e}");
            }
        }
        reply
    }

    /// Like [`respond`](Self::respond), but surfaces search failures.
    ///
    /// The turn is recorded either way; on error the session has already
    /// received the fallback reply.
    pub fn try_respond(&self, session_id: &str, utterance: &str) -> Result<String, IndexError> {
        match self.run_turn(session_id, utterance) {
            (reply, None) => Ok(reply),
            (_, Some(e)) => Err(e),
        }
    }

    /// Search the current index directly. Empty in fallback-only mode.
    pub fn search(&self, query: &str, k: usize, threshold: f32) -> Result<Vec<Match>, IndexError> {
        match self.current_index() {
            Some(index) => index.search(query, k, threshold),
            None => Ok(Vec::new()),
        }
    }

    /// Rebuild the index from `store` and swap it in.
    ///
    /// On failure the previous index stays in place. Turns already running
    /// keep the snapshot they started with.
    pub fn rebuild(&self, store: &dyn KnowledgeStore) -> Result<usize, Error> {
        let index = EmbeddingIndex::from_store(store, Arc::clone(&self.embedder))?;
        let count = index.len();
        let mut slot = self.index.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(index));
        info!(records = count, "Swapped in rebuilt index");
        Ok(count)
    }

    /// Discard a session. Returns whether it existed.
    ///
    /// Long-running callers should end sessions they are done with; idle
    /// ones are otherwise only dropped once `max_sessions` is reached.
    pub fn end_session(&self, session_id: &str) -> bool {
        let removed = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(session_id)
            .is_some();
        if removed {
            debug!(session = session_id, "Ended session");
        }
        removed
    }

    /// A snapshot of a session's context.
    pub fn session(&self, session_id: &str) -> Option<SessionContext> {
        let handle = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(session_id)
            .map(|(handle, _)| Arc::clone(handle))?;
        let ctx = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Some(ctx.clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// The current index snapshot, if one was built.
    pub fn current_index(&self) -> Option<Arc<EmbeddingIndex>> {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_fallback_only(&self) -> bool {
        self.current_index().is_none()
    }

    pub fn classifier(&self) -> &ToneClassifier {
        &self.classifier
    }

    pub fn options(&self) -> &AssistantOptions {
        &self.options
    }

    fn run_turn(&self, session_id: &str, utterance: &str) -> (String, Option<IndexError>) {
        let tone = self.classifier.dominant(utterance);

        let handle = self.session_handle(session_id);
        let mut ctx = handle.lock().unwrap_or_else(PoisonError::into_inner);
        ctx.record(utterance);
        ctx.record_user_turn(utterance, tone);

        let (matches, failure) = match self.search(utterance, self.options.top_k, self.options.min_similarity) {
            Ok(matches) => (matches, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        debug!(
            session = session_id,
            tone = %tone,
            matches = matches.len(),
            "Retrieved matches"
        );

        let reply = {
            let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
            self.composer
                .compose(utterance, &matches, tone, &ctx, &mut **random)
        };
        ctx.record_reply(&reply);

        (reply, failure)
    }

    fn session_handle(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.touch(session_id, self.options.max_sessions, || {
            debug!(session = session_id, "Starting session");
            Arc::new(Mutex::new(SessionContext::with_limits(
                session_id,
                self.options.max_recent_queries,
                self.options.max_turns,
            )))
        })
    }
}

/// Construct the embedder named by `config`.
///
/// An explicit `dimensions` is trusted, so construction does no network I/O
/// and a server that disagrees surfaces as a build error. With `dimensions`
/// unset, Ollama is asked once for its width.
pub fn embedder_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match (config.provider.as_str(), config.dimensions) {
        ("hashing", dimensions) => Ok(Arc::new(HashingEmbedder::new(
            dimensions.unwrap_or(HashingEmbedder::DEFAULT_DIMENSIONS),
        ))),
        ("ollama", Some(dimensions)) => Ok(Arc::new(OllamaEmbedder::new(
            config.url.clone(),
            config.model.clone(),
            dimensions,
            timeout,
        )?)),
        ("ollama", None) => {
            let embedder = OllamaEmbedder::probe(config.url.clone(), config.model.clone(), timeout)?;
            info!(
                model = embedder.model(),
                dimensions = embedder.dimensions(),
                "Using the embedding width reported by Ollama"
            );
            Ok(Arc::new(embedder))
        }
        (other, _) => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}'"
        ))),
    }
}

/// Install the configured embedder as the process-wide instance, or reuse the
/// one already installed.
fn process_embedder(config: &EmbeddingConfig) -> Arc<dyn Embedder> {
    match embedder_from_config(config) {
        Ok(embedder) => {
            if let Err(existing) = install_shared_embedder(embedder) {
                debug!(embedder = existing.name(), "Reusing installed shared embedder");
            }
        }
        Err(e) => warn!("Could not construct configured embedder, using default: {e}"),
    }
    shared_embedder()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FirstChoice;
    use campusbuddy_core::record::{Dining, KnowledgeRecord, Professor};
    use campusbuddy_core::store::StaticStore;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};

    fn store() -> StaticStore {
        StaticStore::new(vec![
            KnowledgeRecord::Dining(Dining {
                name: "The Lair".into(),
                popular_items: vec!["pizza".into()],
                ..Dining::default()
            }),
            KnowledgeRecord::Professor(Professor {
                name: "Dr. Lee".into(),
                ..Professor::default()
            }),
        ])
    }

    fn assistant() -> Assistant {
        Assistant::new(
            &store(),
            Arc::new(HashingEmbedder::default()),
            AssistantOptions::default(),
        )
        .with_random(Box::new(FirstChoice))
    }

    #[test]
    fn pizza_question_is_answered_from_the_lair() {
        let reply = assistant().respond("s1", "where can I get pizza");
        assert!(reply.contains("The Lair"), "{reply}");
    }

    #[test]
    fn sessions_are_created_lazily_and_isolated() {
        let a = assistant();
        assert_eq!(a.session_count(), 0);
        a.respond("s1", "my name is maya");
        a.respond("s2", "hello");
        assert_eq!(a.session_count(), 2);

        let s1 = a.session("s1").unwrap();
        let s2 = a.session("s2").unwrap();
        assert_eq!(s1.attribute("name"), Some("Maya"));
        assert!(s2.attribute("name").is_none());
        assert_eq!(s1.turn_count(), 2);
    }

    #[test]
    fn end_session_discards_context() {
        let a = assistant();
        a.respond("s1", "hello");
        assert!(a.end_session("s1"));
        assert!(!a.end_session("s1"));
        assert!(a.session("s1").is_none());
    }

    #[test]
    fn least_recently_used_session_is_evicted_at_capacity() {
        let a = Assistant::new(
            &store(),
            Arc::new(HashingEmbedder::default()),
            AssistantOptions {
                max_sessions: 2,
                ..AssistantOptions::default()
            },
        )
        .with_random(Box::new(FirstChoice));

        a.respond("s1", "my name is maya");
        a.respond("s2", "hello");
        a.respond("s1", "pizza");
        a.respond("s3", "hello");

        assert_eq!(a.session_count(), 2);
        assert!(a.session("s2").is_none());
        assert_eq!(a.session("s1").unwrap().attribute("name"), Some("Maya"));
        assert!(a.session("s3").is_some());
    }

    #[test]
    fn empty_store_means_fallback_only() {
        let a = Assistant::new(
            &StaticStore::default(),
            Arc::new(HashingEmbedder::default()),
            AssistantOptions::default(),
        );
        assert!(a.is_fallback_only());
        let reply = a.respond("s1", "where can I get pizza");
        assert!(!reply.is_empty());
        assert!(reply.contains("food spots"));
        assert!(a.try_respond("s1", "pizza").is_ok());
    }

    #[test]
    fn rebuild_swaps_index_and_failed_rebuild_keeps_it() {
        let a = Assistant::new(
            &StaticStore::default(),
            Arc::new(HashingEmbedder::default()),
            AssistantOptions::default(),
        );
        assert!(a.is_fallback_only());

        assert_eq!(a.rebuild(&store()).unwrap(), 2);
        assert!(!a.is_fallback_only());

        assert!(a.rebuild(&StaticStore::default()).is_err());
        assert_eq!(a.current_index().map(|i| i.len()), Some(2));
    }

    #[test]
    fn held_snapshot_survives_rebuild() {
        let a = assistant();
        let before = a.current_index().unwrap();
        a.rebuild(&StaticStore::new(vec![KnowledgeRecord::Professor(Professor {
            name: "Dr. Okafor".into(),
            ..Professor::default()
        })]))
        .unwrap();
        assert_eq!(before.len(), 2);
        assert_eq!(a.current_index().unwrap().len(), 1);
    }

    #[test]
    fn embedder_from_config_honours_provider() {
        let mut config = EmbeddingConfig::default();
        let hashing = embedder_from_config(&config).unwrap();
        assert_eq!(hashing.name(), "hashing");
        assert_eq!(hashing.dimensions(), HashingEmbedder::DEFAULT_DIMENSIONS);

        config.dimensions = Some(64);
        assert_eq!(embedder_from_config(&config).unwrap().dimensions(), 64);

        config.provider = "ollama".into();
        let ollama = embedder_from_config(&config).unwrap();
        assert_eq!(ollama.name(), "ollama");
        assert_eq!(ollama.dimensions(), 64);

        config.provider = "word2vec".into();
        assert!(embedder_from_config(&config).is_err());
    }

    /// Answer every connection with a constant embedding of `width` floats.
    fn serve_embeddings(width: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let _ = answer_embedding_request(stream, width);
            }
        });
        format!("http://{addr}")
    }

    fn answer_embedding_request(mut stream: TcpStream, width: usize) -> std::io::Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body)?;

        let payload = format!("{{\"embedding\":[{}]}}", vec!["0.5"; width].join(","));
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
            payload.len()
        )?;
        stream.flush()
    }

    #[test]
    fn unset_ollama_width_is_learned_from_the_server() {
        let mut config = EmbeddingConfig::default();
        config.provider = "ollama".into();
        config.url = serve_embeddings(768);
        config.timeout_secs = 5;
        assert_eq!(config.dimensions, None);

        let embedder = embedder_from_config(&config).unwrap();
        assert_eq!(embedder.dimensions(), 768);

        let a = Assistant::new(&store(), embedder, AssistantOptions::default())
            .with_random(Box::new(FirstChoice));
        assert!(!a.is_fallback_only());
        assert_eq!(a.current_index().map(|i| i.dimensions()), Some(768));
        assert!(a.respond("s1", "where can I get pizza").contains("The Lair"));
    }

    #[test]
    fn unset_ollama_width_without_server_is_an_error() {
        let mut config = EmbeddingConfig::default();
        config.provider = "ollama".into();
        config.url = "http://127.0.0.1:9".into();
        config.timeout_secs = 2;
        assert!(embedder_from_config(&config).is_err());
    }
}
