//! Turn and conversation identity domain types.
//!
//! These are the value objects that flow through the system:
//! a browser submits a message → the orchestrator persists it as a Turn →
//! the assembled context goes upstream → the reply comes back as another Turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies which conversation a turn belongs to.
///
/// At the HTTP boundary this is the caller's phone number; single-user
/// deployments fall back to a fixed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// A single persisted message in a conversation.
///
/// Turns are append-only: once written they are never updated, and they are
/// only removed when the owning conversation is cleared as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Storage-assigned row id; breaks ordering ties between turns that
    /// share a timestamp.
    pub id: i64,

    /// The conversation this turn belongs to
    pub conversation_id: ConversationId,

    /// Who sent this turn
    pub role: Role,

    /// The text content (non-empty)
    pub content: String,

    /// Assigned at persistence time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
        assert_eq!(Role::User.as_str(), "user");
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn conversation_id_from_phone_number() {
        let id = ConversationId::from("+15550001111");
        assert_eq!(id.as_str(), "+15550001111");
        assert_eq!(id.to_string(), "+15550001111");
    }

    #[test]
    fn fresh_conversation_ids_are_unique() {
        assert_ne!(ConversationId::new(), ConversationId::new());
    }

    #[test]
    fn turn_serialization_roundtrip() {
        let turn = Turn {
            id: 7,
            conversation_id: ConversationId::from("c1"),
            role: Role::User,
            content: "Hi".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 7);
        assert_eq!(back.role, Role::User);
        assert_eq!(back.content, "Hi");
    }
}
