//! Tone vocabulary tables.

use campusbuddy_core::tone::Tone;

/// Number of framings every variation-capable formatter offers.
pub const FRAMINGS: usize = 3;

/// The words a reply is dressed in for one register.
#[derive(Debug)]
pub struct Vocabulary {
    pub greetings: &'static [&'static str],
    /// Ends a greeting: "Hey Maya!" vs "Good day, Maya."
    pub greeting_end: &'static str,
    /// One lead-in sentence per framing.
    pub lead_ins: [&'static str; FRAMINGS],
    /// Intensifier for "popular", "well rated", and similar.
    pub emphasis: &'static str,
    pub closings: &'static [&'static str],
    pub apologies: &'static [&'static str],
    pub tip_label: &'static str,
    pub trivia_label: &'static str,
    pub introduction: &'static str,
    pub nudge: &'static str,
    pub menu_intro: &'static str,
}

const CASUAL: Vocabulary = Vocabulary {
    greetings: &["Yo", "Hey bestie", "Heyyy", "What's good"],
    greeting_end: "!",
    lead_ins: [
        "Okay so here's the scoop.",
        "Ooh, got another one for you.",
        "Real talk, try this.",
    ],
    emphasis: "seriously",
    closings: &["Hope that helps! 🔥", "Enjoy! ✨", "Lmk if you need more 💯"],
    apologies: &[
        "Ngl, I got nothing on that one 😅",
        "Hmm, that one's not in my notes fr",
    ],
    tip_label: "Heads up:",
    trivia_label: "Campus tea:",
    introduction: "I'm CampusBuddy, your campus bestie.",
    nudge: "Try hitting me with something else!",
    menu_intro: "I know all about",
};

const FORMAL: Vocabulary = Vocabulary {
    greetings: &["Good day", "Hello", "Welcome"],
    greeting_end: ".",
    lead_ins: [
        "Here is what I found.",
        "Allow me to suggest an alternative.",
        "Another option may suit you.",
    ],
    emphasis: "particularly",
    closings: &[
        "I hope this information is helpful.",
        "Please let me know if I may assist further.",
    ],
    apologies: &[
        "I apologize, but I could not find information on that topic.",
        "Regrettably, I do not have details on that subject.",
    ],
    tip_label: "Please note:",
    trivia_label: "For your interest:",
    introduction: "I am CampusBuddy, a campus information assistant.",
    nudge: "You may wish to rephrase your question.",
    menu_intro: "I can provide information on",
};

const ACADEMIC: Vocabulary = Vocabulary {
    greetings: &["Greetings", "Hello"],
    greeting_end: ".",
    lead_ins: [
        "Based on the available records:",
        "An alternative worth considering:",
        "A further option in the records:",
    ],
    emphasis: "notably",
    closings: &[
        "I hope this is useful for your planning.",
        "Further details are available on request.",
    ],
    apologies: &[
        "Unfortunately, the available records do not address that query.",
        "The knowledge base contains no evidence on that question.",
    ],
    tip_label: "Caveat:",
    trivia_label: "Of note:",
    introduction: "I am CampusBuddy; I answer questions from a structured campus knowledge base.",
    nudge: "A more specific query may yield results.",
    menu_intro: "The records cover",
};

const NEUTRAL: Vocabulary = Vocabulary {
    greetings: &["Hi", "Hey there", "Hello"],
    greeting_end: "!",
    lead_ins: [
        "Here's what I found.",
        "Here's another idea.",
        "You might also like this one.",
    ],
    emphasis: "really",
    closings: &["Hope that helps!", "Anything else you'd like to know?"],
    apologies: &[
        "Sorry, I couldn't find anything about that.",
        "Hmm, I don't have info on that yet.",
    ],
    tip_label: "Note:",
    trivia_label: "Fun fact:",
    introduction: "I'm CampusBuddy, your campus guide.",
    nudge: "Want to try asking another way?",
    menu_intro: "I can help with",
};

pub fn vocabulary(tone: Tone) -> &'static Vocabulary {
    match tone {
        Tone::Casual => &CASUAL,
        Tone::Formal => &FORMAL,
        Tone::Academic => &ACADEMIC,
        Tone::Neutral => &NEUTRAL,
    }
}

impl Vocabulary {
    /// "Hey bestie, Maya!" style greeting, or the bare greeting when no
    /// name is known.
    pub fn greeting(&self, greeting: &str, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{greeting}, {name}{}", self.greeting_end),
            None => format!("{greeting}{}", self.greeting_end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TONES: [Tone; 4] = [Tone::Casual, Tone::Formal, Tone::Academic, Tone::Neutral];

    #[test]
    fn every_table_is_populated() {
        for tone in ALL_TONES {
            let v = vocabulary(tone);
            assert!(!v.greetings.is_empty(), "{tone}");
            assert!(!v.closings.is_empty(), "{tone}");
            assert!(!v.apologies.is_empty(), "{tone}");
            assert!(v.lead_ins.iter().all(|l| !l.is_empty()), "{tone}");
        }
    }

    #[test]
    fn lead_ins_are_distinct_per_tone() {
        for tone in ALL_TONES {
            let [a, b, c] = vocabulary(tone).lead_ins;
            assert!(a != b && b != c && a != c, "{tone}");
        }
    }

    #[test]
    fn greeting_includes_name_when_known() {
        let v = vocabulary(Tone::Formal);
        assert_eq!(v.greeting("Good day", Some("Maya")), "Good day, Maya.");
        assert_eq!(v.greeting("Good day", None), "Good day.");
    }
}
