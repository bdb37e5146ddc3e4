//! Conversation turns and the ordered transcript sent to completion providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Speaker of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub const VALUES: &[Role] = &[Role::User, Role::Assistant, Role::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            _ => Err(Error::Parse(format!("unknown role: {s}"))),
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// Ordered conversation; insertion order is send order.
///
/// Only `append` and `clear` mutate it. Content is never validated, so empty
/// prompts are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript seeded with a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.append(Turn::system(prompt));
        transcript
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The most recently appended turn, `None` when empty
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Whether the transcript may be sent to a completion provider
    pub fn awaits_reply(&self) -> bool {
        self.last_turn().is_some_and(|turn| !turn.is_assistant())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Owned copy handed to a background completion task
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::VALUES {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert_eq!("ASSISTANT".parse::<Role>().unwrap(), Role::Assistant);
    }

    #[test]
    fn test_role_from_str_unknown() {
        let err = "tool".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "parse error: unknown role: tool");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_transcript_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("hello"));
        transcript.append(Turn::assistant("hi there"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0], Turn::user("hello"));
        assert_eq!(transcript.last_turn(), Some(&Turn::assistant("hi there")));
    }

    #[test]
    fn test_transcript_last_turn_empty() {
        let transcript = Transcript::new();
        assert!(transcript.last_turn().is_none());
        assert!(transcript.is_empty());
        assert!(!transcript.awaits_reply());
    }

    #[test]
    fn test_transcript_clear() {
        let mut transcript = Transcript::with_system_prompt("be brief");
        transcript.append(Turn::user("a"));
        transcript.append(Turn::assistant("b"));
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_transcript_accepts_empty_content() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user(""));
        assert_eq!(transcript.last_turn().map(|t| t.content.as_str()), Some(""));
        assert!(transcript.awaits_reply());
    }

    #[test]
    fn test_awaits_reply_tracks_last_role() {
        let mut transcript = Transcript::with_system_prompt("sys");
        assert!(transcript.awaits_reply());
        transcript.append(Turn::user("q"));
        assert!(transcript.awaits_reply());
        transcript.append(Turn::assistant("a"));
        assert!(!transcript.awaits_reply());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("one"));
        let snapshot = transcript.snapshot();
        transcript.append(Turn::user("two"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(transcript.len(), 2);
    }
}
