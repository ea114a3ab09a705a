//! Session context: what one conversation has said so far.
//!
//! A [`SessionContext`] is owned by exactly one conversation. It tracks:
//!
//! - **Recent queries**: bounded, oldest evicted first
//! - **Query frequency**: per normalized utterance, for repeat detection
//! - **Attributes**: name, major, year, and dorm the user mentioned about
//!   themselves (last write wins)
//! - **Turns**: the user/assistant exchange with timestamps, bounded
//!
//! Normalization for repeat detection is lowercase + trim and nothing else,
//! so "Where should I eat?" and "Where should I eat?!" are different questions.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::LazyLock;

use campusbuddy_core::message::{Role, Turn};
use campusbuddy_core::tone::Tone;
use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::Serialize;
use tracing::{debug, warn};

pub const DEFAULT_MAX_RECENT_QUERIES: usize = 10;
pub const DEFAULT_MAX_TURNS: usize = 50;

pub const ATTR_NAME: &str = "name";
pub const ATTR_MAJOR: &str = "major";
pub const ATTR_YEAR: &str = "year";
pub const ATTR_DORM: &str = "dorm";

/// Per-conversation state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    id: String,
    recent_queries: VecDeque<String>,
    query_frequency: HashMap<String, usize>,
    attributes: BTreeMap<String, String>,
    turns: VecDeque<Turn>,
    total_queries: usize,
    max_recent_queries: usize,
    max_turns: usize,
    created_at: DateTime<Utc>,
}

/// The repeat-detection key for an utterance.
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

impl SessionContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_limits(id, DEFAULT_MAX_RECENT_QUERIES, DEFAULT_MAX_TURNS)
    }

    /// Create a session with explicit bounds. Zero bounds are raised to one.
    pub fn with_limits(id: impl Into<String>, max_recent_queries: usize, max_turns: usize) -> Self {
        Self {
            id: id.into(),
            recent_queries: VecDeque::new(),
            query_frequency: HashMap::new(),
            attributes: BTreeMap::new(),
            turns: VecDeque::new(),
            total_queries: 0,
            max_recent_queries: max_recent_queries.max(1),
            max_turns: max_turns.max(1),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Note a user utterance: remember it, count it, and pick up any
    /// self-introduced attributes.
    pub fn record(&mut self, utterance: &str) {
        self.recent_queries.push_back(utterance.to_string());
        while self.recent_queries.len() > self.max_recent_queries {
            self.recent_queries.pop_front();
        }

        *self.query_frequency.entry(normalize(utterance)).or_insert(0) += 1;
        self.total_queries += 1;

        for (key, value) in EXTRACTOR.extract(utterance) {
            debug!(session = %self.id, attribute = key, value = %value, "Extracted user attribute");
            self.attributes.insert(key.to_string(), value);
        }
    }

    /// Whether this normalized utterance has been recorded more than once.
    pub fn is_repeated(&self, utterance: &str) -> bool {
        self.frequency(utterance) > 1
    }

    pub fn frequency(&self, utterance: &str) -> usize {
        self.query_frequency
            .get(&normalize(utterance))
            .copied()
            .unwrap_or(0)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn recent_queries(&self) -> impl Iterator<Item = &str> {
        self.recent_queries.iter().map(String::as_str)
    }

    /// Number of utterances recorded over the session's lifetime.
    pub fn query_count(&self) -> usize {
        self.total_queries
    }

    /// True until a second utterance has been recorded.
    pub fn is_first_turn(&self) -> bool {
        self.total_queries <= 1
    }

    pub fn record_user_turn(&mut self, text: &str, tone: Tone) {
        self.push_turn(Turn::user(text, tone));
    }

    pub fn record_reply(&mut self, text: &str) {
        self.push_turn(Turn::assistant(text));
    }

    /// The most recent assistant reply still in the turn log.
    pub fn last_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.text.as_str())
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    fn push_turn(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }
}

// ── Attribute extraction ──────────────────────────────────────────────────

/// (spoken form, canonical major)
const MAJORS: &[(&str, &str)] = &[
    ("computer science", "computer science"),
    ("cs", "computer science"),
    ("comp sci", "computer science"),
    ("business", "business"),
    ("finance", "finance"),
    ("accounting", "accounting"),
    ("psychology", "psychology"),
    ("psych", "psychology"),
    ("film", "film and television"),
    ("english", "english"),
    ("engineering", "engineering"),
    ("mechanical engineering", "mechanical engineering"),
    ("biology", "biology"),
    ("bio", "biology"),
    ("chemistry", "chemistry"),
    ("economics", "economics"),
    ("econ", "economics"),
    ("mathematics", "mathematics"),
    ("math", "mathematics"),
    ("history", "history"),
    ("philosophy", "philosophy"),
    ("communication studies", "communication studies"),
    ("communications", "communication studies"),
    ("political science", "political science"),
    ("poli sci", "political science"),
];

/// (spoken form, canonical year)
const YEARS: &[(&str, &str)] = &[
    ("freshman", "freshman"),
    ("first year", "freshman"),
    ("first-year", "freshman"),
    ("sophomore", "sophomore"),
    ("second year", "sophomore"),
    ("second-year", "sophomore"),
    ("junior", "junior"),
    ("third year", "junior"),
    ("third-year", "junior"),
    ("senior", "senior"),
    ("fourth year", "senior"),
    ("fourth-year", "senior"),
    ("grad student", "graduate"),
    ("graduate student", "graduate"),
];

/// (spoken form, display name)
const DORMS: &[(&str, &str)] = &[
    ("del rey north", "Del Rey North"),
    ("del rey south", "Del Rey South"),
    ("del rey", "Del Rey"),
    ("palm north", "Palm North"),
    ("palm south", "Palm South"),
    ("hannon", "Hannon"),
    ("mccarthy", "McCarthy"),
    ("doheny", "Doheny"),
    ("rosecrans", "Rosecrans"),
    ("whelan", "Whelan"),
    ("desmond", "Desmond"),
    ("tenderich", "Tenderich"),
    ("leavey", "Leavey"),
];

static EXTRACTOR: LazyLock<AttributeExtractor> = LazyLock::new(AttributeExtractor::new);

/// Best-effort pattern matching for self-introduced facts. A pattern that
/// fails to compile or match simply leaves its attribute unset.
struct AttributeExtractor {
    name: Option<Regex>,
    major: Option<Regex>,
    year: Option<Regex>,
    dorm: Option<Regex>,
}

impl AttributeExtractor {
    fn new() -> Self {
        let majors = alternation(MAJORS);
        let years = alternation(YEARS);
        let dorms = alternation(DORMS);

        Self {
            name: compile(r"(?i)\b(?:my name is|my name's|name's|call me|i go by)\s+([a-z][a-z'\-]*)"),
            major: compile(&format!(
                r"(?i)\b(?:majoring in|major in|studying|i study)\s+({majors})\b|\b({majors})\s+major\b"
            )),
            year: compile(&format!(r"(?i)\b({years})\b")),
            dorm: compile(&format!(
                r"(?i)\b(?:live in|living in|staying in|my dorm is|i'm in)\s+(?:the\s+)?({dorms})\b"
            )),
        }
    }

    fn extract(&self, utterance: &str) -> Vec<(&'static str, String)> {
        let mut found = Vec::new();

        if let Some(name) = capture(&self.name, utterance) {
            found.push((ATTR_NAME, capitalize(&name)));
        }
        if let Some(major) = capture(&self.major, utterance).and_then(|m| canonical(MAJORS, &m)) {
            found.push((ATTR_MAJOR, major.to_string()));
        }
        if let Some(year) = capture(&self.year, utterance).and_then(|y| canonical(YEARS, &y)) {
            found.push((ATTR_YEAR, year.to_string()));
        }
        if let Some(dorm) = capture(&self.dorm, utterance).and_then(|d| canonical(DORMS, &d)) {
            found.push((ATTR_DORM, dorm.to_string()));
        }

        found
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "Skipping invalid attribute pattern");
            None
        }
    }
}

/// Longest spoken forms first so "del rey north" wins over "del rey".
fn alternation(table: &[(&str, &str)]) -> String {
    let mut forms: Vec<&str> = table.iter().map(|(spoken, _)| *spoken).collect();
    forms.sort_by_key(|f| std::cmp::Reverse(f.len()));
    forms.join("|")
}

/// The first participating capture group of the first match.
fn capture(re: &Option<Regex>, text: &str) -> Option<String> {
    let caps = re.as_ref()?.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

fn canonical(table: &[(&str, &'static str)], spoken: &str) -> Option<&'static str> {
    let spoken = spoken.to_lowercase();
    table
        .iter()
        .find(|(form, _)| *form == spoken)
        .map(|(_, canonical)| *canonical)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
