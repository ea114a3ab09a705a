//! Conversation turn types.
//!
//! A session keeps an ordered log of turns: what the user said (with the
//! register it was classified as) and what the assistant replied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tone::Tone;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student asking questions
    User,
    /// The campus assistant
    Assistant,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,

    pub text: String,

    /// Detected register (user turns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,

    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            tone: Some(tone),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            tone: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_turn_carries_tone() {
        let turn = Turn::user("yo", Tone::Casual);
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.tone, Some(Tone::Casual));
    }

    #[test]
    fn assistant_turn_omits_tone_when_serialized() {
        let json = serde_json::to_string(&Turn::assistant("Hi!")).unwrap();
        assert!(json.contains("\"assistant\""));
        assert!(!json.contains("tone"));
    }
}
