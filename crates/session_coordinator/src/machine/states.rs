//! Lane states - the per-lane lifecycle of a session
//!
//! Each lane is a two-state machine; lanes overlap freely but a lane
//! never carries more than one in-flight request.

use serde::{Deserialize, Serialize};

/// State of the chat-command lane.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandLane {
    /// Ready to accept a command.
    #[default]
    Idle,

    /// A command has been sent; the agent has not answered yet.
    AwaitingAgentResponse,
}

/// State of the upload lane.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadLane {
    /// Ready to accept an upload.
    #[default]
    Idle,

    /// A file is being uploaded.
    AwaitingUpload,
}

/// Combined lane view of one session.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Lanes {
    pub command: CommandLane,
    pub upload: UploadLane,
}

impl Lanes {
    /// Whether a new chat command may be submitted right now.
    pub fn accepts_command(&self) -> bool {
        self.command == CommandLane::Idle
    }

    /// Whether a new upload may be started right now.
    pub fn accepts_upload(&self) -> bool {
        self.upload == UploadLane::Idle
    }

    /// Human-readable description of what the session is doing.
    pub fn description(&self) -> &str {
        match (self.command, self.upload) {
            (CommandLane::AwaitingAgentResponse, _) => "Waiting for the agent",
            (_, UploadLane::AwaitingUpload) => "Uploading",
            _ => "Ready",
        }
    }
}
