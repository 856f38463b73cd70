//! CompletionProvider trait — the abstraction over the upstream API.
//!
//! A provider takes an ordered sequence of (role, content) pairs and returns
//! a single assistant reply. The orchestrator calls `complete()` without
//! knowing which endpoint is behind it.

use crate::error::UpstreamError;
use crate::turn::{Role, Turn};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One (role, content) pair in the wire format the upstream API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatTurn {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// A completion request: the assembled context plus generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4.1-mini")
    pub model: String,

    /// The ordered context, newest user turn last
    pub turns: Vec<ChatTurn>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            turns,
            temperature: default_temperature(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A complete reply from the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReply {
    /// The assistant's text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// The core CompletionProvider trait.
///
/// Every non-success outcome (timeout, bad status, unparseable body) comes
/// back as an [`UpstreamError`]; the orchestrator treats them uniformly.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send the assembled context and wait for the single reply.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionReply, UpstreamError>;

    /// Health check — can we reach the upstream endpoint?
    async fn health_check(&self) -> std::result::Result<bool, UpstreamError> {
        Ok(true)
    }
}
