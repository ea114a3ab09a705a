//! Response composer: turns retrieval results into a tone-matched reply.
//!
//! The composer is stateless between calls. Everything it needs arrives as
//! arguments: the query, the matches (best first), the detected tone, the
//! session context (already updated with this query), and the random source.
//!
//! Reply shapes:
//!
//! - **Answer**: optional greeting on the first turn, a lead-in, the top
//!   match rendered by its category formatter, a closing, and sometimes a
//!   line of campus lore
//! - **Repeat**: for variation-capable categories, an alternative framing
//!   and (when other same-category matches exist) a different venue; never
//!   the previous answer verbatim
//! - **Fallback**: apology plus a menu of supported topics; an introduction
//!   on first contact, a nudge afterwards

pub mod formatters;
pub mod trivia;
pub mod vocabulary;

use campusbuddy_core::random::RandomSource;
use campusbuddy_core::record::{Category, KnowledgeRecord};
use campusbuddy_core::tone::Tone;
use campusbuddy_index::Match;
use tracing::debug;

use crate::session::{ATTR_NAME, SessionContext};
use formatters::{framing_count, render};
use vocabulary::{FRAMINGS, Vocabulary, vocabulary};

pub const DEFAULT_TRIVIA_PROBABILITY: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct ResponseComposer {
    trivia_probability: f64,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(DEFAULT_TRIVIA_PROBABILITY)
    }
}

impl ResponseComposer {
    /// `trivia_probability` is clamped to `[0, 1]`.
    pub fn new(trivia_probability: f64) -> Self {
        Self {
            trivia_probability: trivia_probability.clamp(0.0, 1.0),
        }
    }

    pub fn trivia_probability(&self) -> f64 {
        self.trivia_probability
    }

    /// Compose the reply to `query`. Never fails and never returns an empty
    /// string.
    pub fn compose(
        &self,
        query: &str,
        matches: &[Match],
        tone: Tone,
        context: &SessionContext,
        rng: &mut dyn RandomSource,
    ) -> String {
        let vocab = vocabulary(tone);
        let Some(top) = matches.first() else {
            debug!(tone = %tone, "No match above threshold, composing fallback");
            return self.fallback(vocab, context, rng);
        };

        let repeated = context.is_repeated(query) && top.category.supports_variation();
        let body = if repeated {
            diversified_answer(matches, vocab, context, rng)
        } else {
            answer(&top.record, vocab, 0)
        };

        let mut parts = Vec::with_capacity(3);
        if context.is_first_turn() {
            parts.push(greeting(vocab, context, rng));
        }
        parts.push(body);
        parts.push(pick(vocab.closings, rng).to_string());
        let mut reply = parts.join(" ");

        if rng.chance(self.trivia_probability) {
            let lore = pick(trivia::pool(top.category), rng);
            reply.push_str(&format!("\n\n{} {lore}", vocab.trivia_label));
        }

        debug!(
            category = %top.category,
            similarity = top.similarity,
            tone = %tone,
            repeated,
            "Composed answer"
        );
        reply
    }

    fn fallback(
        &self,
        vocab: &Vocabulary,
        context: &SessionContext,
        rng: &mut dyn RandomSource,
    ) -> String {
        let menu = format!("{} {}.", vocab.menu_intro, topic_menu());
        let apology = pick(vocab.apologies, rng);
        if context.is_first_turn() {
            let greeting = greeting(vocab, context, rng);
            format!("{greeting} {} {apology} {menu}", vocab.introduction)
        } else {
            format!("{apology} {} {menu}", vocab.nudge)
        }
    }
}

fn answer(record: &KnowledgeRecord, vocab: &Vocabulary, framing: usize) -> String {
    format!("{} {}", vocab.lead_ins[framing % FRAMINGS], render(record, vocab, framing))
}

/// An answer for a repeated question.
///
/// The top match in its default framing is kept unless the previous reply
/// already showed it (it may have been a fallback). Otherwise start from an
/// alternative venue and framing chosen by `rng`, then walk the remaining
/// combinations until one does not reproduce the previous reply.
fn diversified_answer(
    matches: &[Match],
    vocab: &Vocabulary,
    context: &SessionContext,
    rng: &mut dyn RandomSource,
) -> String {
    let top = &matches[0];
    let previous = context.last_reply();
    let best = answer(&top.record, vocab, 0);
    if previous.is_none_or(|prev| !prev.contains(&best)) {
        return best;
    }

    let venues: Vec<&KnowledgeRecord> = std::iter::once(top)
        .chain(matches[1..].iter().filter(|m| m.category == top.category))
        .map(|m| m.record.as_ref())
        .collect();
    let framings = framing_count(top.category);

    let first_venue = if venues.len() > 1 {
        1 + rng.pick(venues.len() - 1)
    } else {
        0
    };
    let first_framing = if framings > 1 {
        1 + rng.pick(framings - 1)
    } else {
        0
    };

    let mut fallback = None;
    for venue_offset in 0..venues.len() {
        for framing_offset in 0..framings {
            let venue = venues[(first_venue + venue_offset) % venues.len()];
            let framing = (first_framing + framing_offset) % framings;
            let body = answer(venue, vocab, framing);
            if previous.is_none_or(|prev| !prev.contains(&body)) {
                return body;
            }
            fallback.get_or_insert(body);
        }
    }
    fallback.unwrap_or(best)
}

fn greeting(vocab: &Vocabulary, context: &SessionContext, rng: &mut dyn RandomSource) -> String {
    vocab.greeting(pick(vocab.greetings, rng), context.attribute(ATTR_NAME))
}

fn pick<'a>(options: &[&'a str], rng: &mut dyn RandomSource) -> &'a str {
    if options.is_empty() {
        return "";
    }
    options.get(rng.pick(options.len())).copied().unwrap_or(options[0])
}

/// "professors, courses, ... and campus news"
fn topic_menu() -> String {
    let topics: Vec<&str> = Category::ALL.iter().map(|c| c.topic()).collect();
    match topics.split_last() {
        Some((last, init)) if !init.is_empty() => format!("{} and {last}", init.join(", ")),
        Some((last, _)) => (*last).to_string(),
        None => String::new(),
    }
}
