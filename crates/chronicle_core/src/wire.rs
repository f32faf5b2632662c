//! Wire DTOs - serde shapes matching the backend JSON contracts
//!
//! These mirror the payloads of the project-state, preview, agent-invoke,
//! upload and plots endpoints. They are consumed as opaque contracts; the
//! client does not interpret HTTP semantics beyond success/failure.

use serde::{Deserialize, Serialize};

use crate::chat::{AgentAnswer, AgentThought, ChatTurn};
use crate::preview::{PlotRecord, PreviewTable};

/// `GET /api/project/state` response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ProjectStateDto {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
    pub active_node_id: Option<String>,
}

/// Raw node as reported by the server: id plus display label only.
/// Positions and active-marking are client concerns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodeDto {
    pub id: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EdgeDto {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// `GET /api/dataframe/{id}/preview` response (pandas "split" orient).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PreviewDto {
    pub columns: Vec<String>,
    pub data: Vec<Vec<serde_json::Value>>,
}

impl From<PreviewDto> for PreviewTable {
    fn from(dto: PreviewDto) -> Self {
        PreviewTable {
            columns: dto.columns,
            rows: dto.data,
        }
    }
}

/// `POST /api/agent/invoke` request body.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AgentInvokeRequest {
    pub input: String,
}

/// The agent's `final_answer` field: a bare string or a structured object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum FinalAnswerDto {
    Text(String),
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text_result: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_base64: Option<String>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AgentThoughtDto {
    pub tool: String,
    pub tool_input: String,
    pub log: String,
}

/// `POST /api/agent/invoke` response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AgentResponseDto {
    pub final_answer: FinalAnswerDto,
    #[serde(default)]
    pub thoughts: Vec<AgentThoughtDto>,
}

impl AgentResponseDto {
    /// Convert the wire payload into a transcript turn.
    pub fn into_agent_turn(self) -> ChatTurn {
        let answer = match self.final_answer {
            FinalAnswerDto::Text(text) => AgentAnswer::Text(text),
            FinalAnswerDto::Structured {
                text_result,
                image_base64,
            } => AgentAnswer::Structured {
                text_result,
                image_base64,
            },
        };
        let thoughts = self
            .thoughts
            .into_iter()
            .map(|t| AgentThought {
                tool: t.tool,
                tool_input: t.tool_input,
                log: t.log,
            })
            .collect();
        ChatTurn::agent(answer, thoughts)
    }
}

/// `POST /api/upload` success response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadResponseDto {
    pub message: String,
}

/// `GET /api/project/plots` response element.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlotDto {
    pub id: String,
    pub image_base64: String,
}

impl From<PlotDto> for PlotRecord {
    fn from(dto: PlotDto) -> Self {
        PlotRecord {
            id: dto.id,
            image_base64: dto.image_base64,
        }
    }
}

/// Error body the backend attaches to failed requests. Some endpoints use
/// `error`, others `detail`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ApiErrorDto {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorDto {
    /// Best-effort human readable message from whichever field is set.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().or(self.detail.as_deref())
    }
}
