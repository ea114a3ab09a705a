//! Category formatters: one per record kind, selected by `match`.
//!
//! Variation-capable categories offer [`FRAMINGS`] distinct sentence
//! structures; the rest render a single framing. Every framing names the
//! record.

use campusbuddy_core::record::{
    Category, Course, Dining, Event, Facility, Housing, KnowledgeRecord, News, Organization,
    Professor,
};

use super::vocabulary::{FRAMINGS, Vocabulary};

/// How many framings `category` offers.
pub fn framing_count(category: Category) -> usize {
    if category.supports_variation() {
        FRAMINGS
    } else {
        1
    }
}

/// Render `record` as prose in `framing` (taken modulo the category's count).
pub fn render(record: &KnowledgeRecord, vocab: &Vocabulary, framing: usize) -> String {
    let framing = framing % framing_count(record.category());
    match record {
        KnowledgeRecord::Professor(p) => professor(p, vocab),
        KnowledgeRecord::Course(c) => course(c, vocab),
        KnowledgeRecord::Dining(d) => dining(d, vocab, framing),
        KnowledgeRecord::Housing(h) => housing(h, vocab, framing),
        KnowledgeRecord::Event(e) => event(e, framing),
        KnowledgeRecord::Organization(o) => organization(o, framing),
        KnowledgeRecord::Facility(f) => facility(f, framing),
        KnowledgeRecord::News(n) => news(n),
    }
}

fn professor(p: &Professor, v: &Vocabulary) -> String {
    let name = label(&p.name, "This professor");
    let mut prose = Prose::default();
    match present(&p.department) {
        Some(dept) => prose.push(format!("{name} teaches in {dept}")),
        None => prose.push(format!("{name} is on the faculty here")),
    }
    if let Some(r) = p.rating {
        prose.push(format!("Students rate them {} ({})", v.rating_phrase(r), rating(r)));
    }
    if let Some(courses) = join_list(&p.courses) {
        prose.push(format!("Courses include {courses}"));
    }
    if let Some(tags) = join_list(&p.tags) {
        prose.push(format!("Reviews describe them as {tags}"));
    }
    if let Some(office) = present(&p.office) {
        prose.push(format!("Office: {office}"));
    }
    prose.finish()
}

fn course(c: &Course, v: &Vocabulary) -> String {
    let title = match (c.code.trim(), c.name.trim()) {
        ("", "") => "This course".to_string(),
        (code, "") => code.to_string(),
        ("", name) => name.to_string(),
        (code, name) => format!("{code} ({name})"),
    };
    let mut prose = Prose::default();
    match present(&c.department) {
        Some(dept) => prose.push(format!("{title} is offered by {dept}")),
        None => prose.push(format!("{title} is on the course list")),
    }
    if let Some(desc) = present(&c.description) {
        prose.push(desc);
    }
    if let Some(prof) = present(&c.professor) {
        prose.push(format!("It is taught by {prof}"));
    }
    if let Some(credits) = c.credits {
        let unit = if credits == 1 { "credit" } else { "credits" };
        prose.push(format!("It carries {credits} {unit}"));
    }
    if let Some(r) = c.rating {
        prose.push(format!("Students rate it {} ({})", v.rating_phrase(r), rating(r)));
    }
    prose.finish()
}

fn dining(d: &Dining, v: &Vocabulary, framing: usize) -> String {
    let name = label(&d.name, "This dining spot");
    let items = join_list(&d.popular_items);
    let mut prose = Prose::default();
    match framing {
        0 => {
            match present(&d.kind) {
                Some(kind) => prose.push(format!("{name} is {} {kind} on campus", article(kind))),
                None => prose.push(format!("{name} is a go-to spot for food on campus")),
            }
            if let Some(items) = &items {
                prose.push(format!(
                    "The {items} {} {} popular",
                    verb_be(d.popular_items.len()),
                    v.emphasis
                ));
            }
            if let Some(hours) = present(&d.hours) {
                prose.push(format!("Hours: {hours}"));
            }
            if let Some(r) = d.rating {
                prose.push(format!("Students rate it {}", rating(r)));
            }
        }
        1 => {
            prose.push(format!("Have you tried {name}?"));
            if let Some(features) = join_list(&d.features) {
                prose.push(format!("It offers {features}"));
            }
            if let Some(items) = &items {
                prose.push(format!("Go for the {items}"));
            }
        }
        _ => {
            prose.push(format!("Swing by {name}{}", parenthetical(&d.kind)));
            if let Some(desc) = present(&d.description) {
                prose.push(desc);
            }
            if let Some(hours) = present(&d.hours) {
                prose.push(format!("It's open {hours}"));
            }
        }
    }
    prose.finish()
}

fn housing(h: &Housing, v: &Vocabulary, framing: usize) -> String {
    let name = label(&h.name, "This residence");
    let mut prose = Prose::default();
    match framing {
        0 => {
            let kind = present(&h.kind).unwrap_or("housing option");
            let mut opening = format!("{name} is {} {kind}", article(kind));
            if let Some(capacity) = h.capacity {
                opening.push_str(&format!(" for about {capacity} residents"));
            }
            prose.push(opening);
            if let Some(features) = join_list(&h.features) {
                prose.push(format!("Features include {features}"));
            }
            if let Some(pros) = join_list(&h.pros) {
                prose.push(format!("Residents {} like the {pros}", v.emphasis));
            }
        }
        1 => {
            prose.push(format!("Consider {name}{}", parenthetical(&h.kind)));
            if let Some(pros) = join_list(&h.pros) {
                prose.push(format!("Upsides: {pros}"));
            }
            if let Some(cons) = join_list(&h.cons) {
                prose.push(format!("{} {cons}", v.tip_label));
            }
        }
        _ => {
            prose.push(format!("Take a look at {name}"));
            if let Some(capacity) = h.capacity {
                prose.push(format!("It houses around {capacity} students"));
            }
            if let Some(features) = join_list(&h.features) {
                prose.push(format!("You get {features}"));
            }
        }
    }
    prose.finish()
}

fn event(e: &Event, framing: usize) -> String {
    let name = label(&e.name, "This event");
    let when_where = match (present(&e.date), present(&e.location)) {
        (Some(date), Some(loc)) => Some(format!("{date} at {loc}")),
        (Some(date), None) => Some(date.to_string()),
        (None, Some(loc)) => Some(format!("at {loc}")),
        (None, None) => None,
    };
    let mut prose = Prose::default();
    match framing {
        0 => {
            match present(&e.kind) {
                Some(kind) => prose.push(format!("{name} is {} {kind} event", article(kind))),
                None => prose.push(format!("{name} is coming up on campus")),
            }
            if let Some(ww) = &when_where {
                prose.push(format!("It happens {ww}"));
            }
            if let Some(desc) = present(&e.description) {
                prose.push(desc);
            }
        }
        1 => {
            match &when_where {
                Some(ww) => prose.push(format!("Mark your calendar for {name}, {ww}")),
                None => prose.push(format!("Mark your calendar for {name}")),
            }
            if let Some(desc) = present(&e.description) {
                prose.push(desc);
            }
        }
        _ => {
            prose.push(format!("Check out {name}{}", parenthetical(&e.kind)));
            if let Some(loc) = present(&e.location) {
                prose.push(format!("Find it at {loc}"));
            }
        }
    }
    prose.finish()
}

fn organization(o: &Organization, framing: usize) -> String {
    let name = label(&o.name, "This organization");
    let events = join_list(&o.events);
    let mut prose = Prose::default();
    match framing {
        0 => {
            match present(&o.kind) {
                Some(kind) => prose.push(format!("{name} is {} {kind} organization", article(kind))),
                None => prose.push(format!("{name} is a student organization")),
            }
            if let Some(desc) = present(&o.description) {
                prose.push(desc);
            }
            if let Some(events) = &events {
                prose.push(format!("They run {events}"));
            }
        }
        1 => {
            prose.push(format!("You could join {name}"));
            if let Some(desc) = present(&o.description) {
                prose.push(desc);
            }
        }
        _ => {
            prose.push(format!("Look into {name}{}", parenthetical(&o.kind)));
            if let Some(events) = &events {
                prose.push(format!("Members get {events}"));
            }
        }
    }
    prose.finish()
}

fn facility(f: &Facility, framing: usize) -> String {
    let name = label(&f.name, "This facility");
    let mut prose = Prose::default();
    match framing {
        0 => {
            match present(&f.kind) {
                Some(kind) => prose.push(format!("{name} is {} {kind}", article(kind))),
                None => prose.push(format!("{name} is open to students")),
            }
            if let Some(hours) = present(&f.hours) {
                prose.push(format!("Hours: {hours}"));
            }
            if let Some(features) = join_list(&f.features) {
                prose.push(format!("It has {features}"));
            }
        }
        1 => {
            prose.push(format!("Head over to {name}"));
            if let Some(spots) = join_list(&f.popular_spots) {
                prose.push(format!("The best spots are {spots}"));
            }
            if let Some(hours) = present(&f.hours) {
                prose.push(format!("It's open {hours}"));
            }
        }
        _ => {
            prose.push(format!("Try {name}{}", parenthetical(&f.kind)));
            if let Some(features) = join_list(&f.features) {
                prose.push(format!("You'll find {features}"));
            }
            if let Some(spots) = join_list(&f.popular_spots) {
                prose.push(format!("Regulars like {spots}"));
            }
        }
    }
    prose.finish()
}

fn news(n: &News) -> String {
    let title = label(&n.title, "A campus story");
    let mut prose = Prose::default();
    match present(&n.date) {
        Some(date) => prose.push(format!("In the news ({date}): {title}")),
        None => prose.push(format!("In the news: {title}")),
    }
    if let Some(summary) = present(&n.summary) {
        prose.push(summary);
    }
    if let Some(topic) = present(&n.topic) {
        prose.push(format!("Filed under {topic}"));
    }
    prose.finish()
}

impl Vocabulary {
    fn rating_phrase(&self, rating: f32) -> String {
        if rating >= 4.0 {
            format!("{} highly", self.emphasis)
        } else {
            "decently".to_string()
        }
    }
}

// ── Prose helpers ─────────────────────────────────────────────────────────

/// Sentences joined by spaces, each terminated.
#[derive(Default)]
struct Prose {
    sentences: Vec<String>,
}

impl Prose {
    fn push(&mut self, sentence: impl Into<String>) {
        let sentence = sentence.into();
        let trimmed = sentence.trim();
        if !trimmed.is_empty() {
            self.sentences.push(trimmed.to_string());
        }
    }

    fn finish(self) -> String {
        self.sentences
            .into_iter()
            .map(|s| {
                if s.ends_with(['.', '!', '?']) {
                    s
                } else {
                    format!("{s}.")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn label<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}

fn parenthetical(value: &Option<String>) -> String {
    present(value).map(|v| format!(" ({v})")).unwrap_or_default()
}

/// "a", "a and b", "a, b and c"; `None` when nothing non-blank remains.
fn join_list(items: &[String]) -> Option<String> {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    match items.as_slice() {
        [] => None,
        [only] => Some((*only).to_string()),
        [init @ .., last] => Some(format!("{} and {last}", init.join(", "))),
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn verb_be(count: usize) -> &'static str {
    if count == 1 { "is" } else { "are" }
}

fn rating(value: f32) -> String {
    format!("{value:.1}/5")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::vocabulary::vocabulary;
    use campusbuddy_core::tone::Tone;

    fn lair() -> KnowledgeRecord {
        KnowledgeRecord::Dining(Dining {
            name: "The Lair".into(),
            popular_items: vec!["pizza".into()],
            ..Dining::default()
        })
    }

    #[test]
    fn every_framing_names_the_record() {
        let v = vocabulary(Tone::Neutral);
        for framing in 0..FRAMINGS {
            assert!(render(&lair(), v, framing).contains("The Lair"), "framing {framing}");
        }
    }

    #[test]
    fn variation_framings_differ() {
        let v = vocabulary(Tone::Casual);
        let texts: Vec<String> = (0..FRAMINGS).map(|f| render(&lair(), v, f)).collect();
        assert_ne!(texts[0], texts[1]);
        assert_ne!(texts[1], texts[2]);
        assert_ne!(texts[0], texts[2]);
    }

    #[test]
    fn dining_first_framing_uses_emphasis() {
        let text = render(&lair(), vocabulary(Tone::Formal), 0);
        assert_eq!(
            text,
            "The Lair is a go-to spot for food on campus. The pizza is particularly popular."
        );
    }

    #[test]
    fn non_variation_category_has_one_framing() {
        let prof = KnowledgeRecord::Professor(Professor {
            name: "Dr. Lee".into(),
            department: Some("Physics".into()),
            rating: Some(4.6),
            courses: vec!["PHYS 101".into(), "PHYS 201".into()],
            ..Professor::default()
        });
        let v = vocabulary(Tone::Neutral);
        assert_eq!(framing_count(Category::Professor), 1);
        assert_eq!(render(&prof, v, 0), render(&prof, v, 2));
        assert_eq!(
            render(&prof, v, 0),
            "Dr. Lee teaches in Physics. Students rate them really highly (4.6/5). Courses include PHYS 101 and PHYS 201."
        );
    }

    #[test]
    fn blank_fields_are_skipped() {
        let housing = KnowledgeRecord::Housing(Housing {
            name: "Del Rey North".into(),
            kind: Some("  ".into()),
            pros: vec!["".into(), "ocean breeze".into()],
            ..Housing::default()
        });
        let text = render(&housing, vocabulary(Tone::Neutral), 0);
        assert_eq!(
            text,
            "Del Rey North is a housing option. Residents really like the ocean breeze."
        );
    }

    #[test]
    fn housing_cons_use_tip_label() {
        let housing = KnowledgeRecord::Housing(Housing {
            name: "Doheny".into(),
            cons: vec!["slow elevators".into()],
            ..Housing::default()
        });
        let text = render(&housing, vocabulary(Tone::Formal), 1);
        assert_eq!(text, "Consider Doheny. Please note: slow elevators.");
    }

    #[test]
    fn nameless_record_still_renders() {
        let record = KnowledgeRecord::Facility(Facility::default());
        let text = render(&record, vocabulary(Tone::Academic), 0);
        assert_eq!(text, "This facility is open to students.");
    }

    #[test]
    fn list_joining() {
        assert_eq!(join_list(&[]), None);
        assert_eq!(join_list(&["a".into()]).as_deref(), Some("a"));
        assert_eq!(join_list(&["a".into(), "b".into()]).as_deref(), Some("a and b"));
        assert_eq!(
            join_list(&["a".into(), "b".into(), "c".into()]).as_deref(),
            Some("a, b and c")
        );
    }

    #[test]
    fn articles() {
        assert_eq!(article("eatery"), "an");
        assert_eq!(article("Marketplace"), "a");
    }
}
