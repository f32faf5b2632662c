//! Session events - what moves the lanes

use serde::{Deserialize, Serialize};

/// Events that drive lane transitions.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    // ========== Command lane ==========
    /// A chat command left for the agent.
    CommandSubmitted,

    /// The agent answered.
    AgentResponded,

    /// The agent call failed; the error is recorded in the transcript.
    AgentFailed { error: String },

    // ========== Upload lane ==========
    /// A file upload started.
    UploadStarted,

    /// The upload finished successfully.
    UploadFinished,

    /// The upload failed.
    UploadFailed { error: String },
}

impl SessionEvent {
    /// Check if this event belongs to the command lane.
    pub fn is_command_event(&self) -> bool {
        matches!(
            self,
            Self::CommandSubmitted | Self::AgentResponded | Self::AgentFailed { .. }
        )
    }

    /// Check if this is an error event.
    pub fn is_error_event(&self) -> bool {
        matches!(self, Self::AgentFailed { .. } | Self::UploadFailed { .. })
    }
}
