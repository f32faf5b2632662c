//! Chat types - Transcript turns and agent answers
//!
//! The transcript is an append-only ordered sequence of turns; turns are
//! never mutated or reordered after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded step of the agent's reasoning (tool invocation trace).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AgentThought {
    /// Name of the tool the agent invoked.
    pub tool: String,
    /// Stringified input passed to the tool.
    pub tool_input: String,
    /// Raw reasoning log emitted alongside the invocation.
    pub log: String,
}

impl AgentThought {
    /// Flat one-line view of the thought, for plain-text renderers.
    pub fn summary(&self) -> String {
        format!("{}({})", self.tool, self.tool_input)
    }
}

/// The agent's final answer: plain text or a structured result.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum AgentAnswer {
    /// Plain text answer (also used for error messages).
    Text(String),

    /// Structured answer carrying a text result and/or a rendered plot.
    Structured {
        #[serde(skip_serializing_if = "Option::is_none")]
        text_result: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_base64: Option<String>,
    },
}

impl AgentAnswer {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Get the displayable text portion of the answer, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured { text_result, .. } => text_result.as_deref(),
        }
    }

    /// Get the base64 plot payload, if the answer carries one.
    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Structured { image_base64, .. } => image_base64.as_deref(),
        }
    }
}

/// A single turn of the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatTurn {
    /// Something the user typed (or a gesture-generated command).
    User {
        id: Uuid,
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// The agent's reply, or a synthetic error turn when the call failed.
    Agent {
        id: Uuid,
        answer: AgentAnswer,
        #[serde(default)]
        thoughts: Vec<AgentThought>,
        timestamp: DateTime<Utc>,
    },
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn agent(answer: AgentAnswer, thoughts: Vec<AgentThought>) -> Self {
        Self::Agent {
            id: Uuid::new_v4(),
            answer,
            thoughts,
            timestamp: Utc::now(),
        }
    }

    /// Synthetic agent turn carrying an error message as the answer text.
    /// Used so a failed round-trip stays visible in the transcript.
    pub fn agent_error(message: impl Into<String>) -> Self {
        Self::agent(AgentAnswer::text(message), Vec::new())
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Displayable text of the turn, if it has one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::User { text, .. } => Some(text),
            Self::Agent { answer, .. } => answer.as_text(),
        }
    }
}
