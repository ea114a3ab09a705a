//! Conversational register types.

use serde::{Deserialize, Serialize};

/// A score above this is required for a register to count as dominant.
pub const DOMINANCE_THRESHOLD: f32 = 0.4;

/// The inferred conversational style of an utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Formal,
    Academic,
    #[default]
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Academic => "academic",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-register scores for one utterance.
///
/// Each component lies in `[0, 1]`; after [`ToneScores::normalized`] they sum
/// to 1 (or are all zero when no signal fired).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneScores {
    pub casual: f32,
    pub formal: f32,
    pub academic: f32,
}

impl ToneScores {
    pub fn total(&self) -> f32 {
        self.casual + self.formal + self.academic
    }

    /// Cap each component at 1.0, then scale so the components sum to 1.
    pub fn normalized(self) -> Self {
        let capped = Self {
            casual: self.casual.clamp(0.0, 1.0),
            formal: self.formal.clamp(0.0, 1.0),
            academic: self.academic.clamp(0.0, 1.0),
        };
        let total = capped.total();
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            casual: capped.casual / total,
            formal: capped.formal / total,
            academic: capped.academic / total,
        }
    }

    /// The argmax register if it clears [`DOMINANCE_THRESHOLD`], else `Neutral`.
    ///
    /// Ties resolve in casual → formal → academic order.
    pub fn dominant(&self) -> Tone {
        let mut best = (Tone::Casual, self.casual);
        for candidate in [(Tone::Formal, self.formal), (Tone::Academic, self.academic)] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        if best.1 > DOMINANCE_THRESHOLD {
            best.0
        } else {
            Tone::Neutral
        }
    }
}
