//! Tone classifier: infers the register of a user utterance.
//!
//! Four independent signal families add to each register's raw score:
//!
//! 1. **Lexical**: curated word and phrase lists (slang, courtesy phrases,
//!    scholarly connectives, citation-like markers), 0.1 per hit
//! 2. **Emoji density**: every non-ASCII symbol adds 0.2 to casual
//! 3. **Typography**: runs of `!!`/`??`, ALL-CAPS words, and camelCase push
//!    casual; semicolons, parentheses, and proper-noun pairs push formal
//! 4. **Contractions**: each one adds 0.05 to casual; a long (>20 word),
//!    low-caps utterance with none adds 0.2 to formal
//!
//! Raw scores are capped at 1.0 and normalized, see [`ToneScores::normalized`].
//! Scoring is pure: the same text always yields the same scores.

use campusbuddy_core::tone::{Tone, ToneScores};
use regex_lite::Regex;
use tracing::{debug, warn};

const LEXICAL_WEIGHT: f32 = 0.1;
const EMOJI_WEIGHT: f32 = 0.2;
const TYPOGRAPHY_WEIGHT: f32 = 0.1;
const CONTRACTION_WEIGHT: f32 = 0.05;
const NO_CONTRACTION_FORMAL_BONUS: f32 = 0.2;
const LONG_UTTERANCE_WORDS: usize = 20;
const LOW_CAPS_RATIO: f32 = 0.1;

const CASUAL_PATTERNS: &[&str] = &[
    r"(?i)\b(?:yo|hey|sup|wassup|fr|ngl|tbh|imo|idk|lol|lmao|omg|smh|tho|bruh|bro|sis|dude|fam|bestie|slay|vibes?|lowkey|highkey|mid|fire|lit|bussin|deadass|no cap)\b",
    r"(?i)\bwhat['’]?s (?:good|up)\b",
];

const CASUAL_TYPOGRAPHY: &[&str] = &[
    r"!{2,}",
    r"\?{2,}",
    r"\b[A-Z]{3,}\b",
    r"\b[a-z]+[A-Z][A-Za-z]*\b",
];

const FORMAL_PATTERNS: &[&str] = &[
    r"(?i)\b(?:kindly|would you|could you|please|regarding|advise|sincerely|respectfully|indeed|certainly|furthermore|moreover|consequently|therefore|thus|hence|accordingly|appreciate|inquire)\b",
    r"(?i)\b(?:mr|mrs|ms|dr|prof)\.",
];

const FORMAL_TYPOGRAPHY: &[&str] = &[r";", r"\(", r"\b[A-Z][a-z]+ [A-Z][a-z]+\b"];

const ACADEMIC_PATTERNS: &[&str] = &[
    r"(?i)\b(?:research|study|studies|analysis|methodology|hypothesis|evidence|data|statistics|correlation|causation|according to|based on|however|nevertheless|conversely)\b",
    r"(?i)\b(?:e\.g\.|i\.e\.|et al\.|vs\.)",
    r"\[\d+\]",
    r"\d+%",
];

const CONTRACTION_PATTERN: &str = r"(?i)\b[a-z]+['’](?:s|t|re|ve|ll|d|m)\b";

/// Scores utterances against the casual, formal, and academic registers.
pub struct ToneClassifier {
    casual: Vec<Regex>,
    formal: Vec<Regex>,
    academic: Vec<Regex>,
    casual_typography: Vec<Regex>,
    formal_typography: Vec<Regex>,
    contraction: Option<Regex>,
}

impl ToneClassifier {
    pub fn new() -> Self {
        Self {
            casual: compile_all(CASUAL_PATTERNS),
            formal: compile_all(FORMAL_PATTERNS),
            academic: compile_all(ACADEMIC_PATTERNS),
            casual_typography: compile_all(CASUAL_TYPOGRAPHY),
            formal_typography: compile_all(FORMAL_TYPOGRAPHY),
            contraction: compile(CONTRACTION_PATTERN),
        }
    }

    /// Raw per-register scores, before capping and normalization.
    pub fn raw_scores(&self, text: &str) -> ToneScores {
        let mut casual = LEXICAL_WEIGHT * count_all(&self.casual, text) as f32;
        let mut formal = LEXICAL_WEIGHT * count_all(&self.formal, text) as f32;
        let academic = LEXICAL_WEIGHT * count_all(&self.academic, text) as f32;

        casual += EMOJI_WEIGHT * emoji_count(text) as f32;
        casual += TYPOGRAPHY_WEIGHT * count_all(&self.casual_typography, text) as f32;
        formal += TYPOGRAPHY_WEIGHT * count_all(&self.formal_typography, text) as f32;

        let contractions = self
            .contraction
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count());
        if contractions > 0 {
            casual += CONTRACTION_WEIGHT * contractions as f32;
        } else if text.split_whitespace().count() > LONG_UTTERANCE_WORDS
            && uppercase_ratio(text) < LOW_CAPS_RATIO
        {
            formal += NO_CONTRACTION_FORMAL_BONUS;
        }

        ToneScores {
            casual,
            formal,
            academic,
        }
    }

    /// Capped, normalized scores for `text`.
    pub fn classify(&self, text: &str) -> ToneScores {
        self.raw_scores(text).normalized()
    }

    /// The dominant register of `text`, or `Neutral` when none clearly leads.
    pub fn dominant(&self, text: &str) -> Tone {
        let scores = self.classify(text);
        let tone = scores.dominant();
        debug!(
            tone = %tone,
            casual = scores.casual,
            formal = scores.formal,
            academic = scores.academic,
            "Classified tone"
        );
        tone
    }
}

impl Default for ToneClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "Skipping invalid tone pattern");
            None
        }
    }
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| compile(p)).collect()
}

fn count_all(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|re| re.find_iter(text).count()).sum()
}

/// Non-ASCII characters that are not letters: emoji, pictographs, symbols.
fn emoji_count(text: &str) -> usize {
    text.chars()
        .filter(|c| !c.is_ascii() && !c.is_alphabetic() && !c.is_whitespace() && !is_typographic(*c))
        .count()
}

/// Curly quotes and dashes are punctuation, not emoji. Joiners and
/// variation selectors belong to the emoji they modify.
fn is_typographic(c: char) -> bool {
    matches!(
        c,
        '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2013}' | '\u{2014}' | '\u{2026}'
            | '\u{200D}' | '\u{FE0F}'
    )
}

fn uppercase_ratio(text: &str) -> f32 {
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if letters == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f32 / letters as f32
}
