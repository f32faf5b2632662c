//! chronicle_core - Core types for the lineage-graph client
//!
//! This crate provides the foundational types used across all client crates:
//! - `graph` - LineageNode, LineageEdge, GraphSnapshot
//! - `chat` - ChatTurn, AgentAnswer, AgentThought
//! - `preview` - PreviewTable, PlotRecord, UploadOutcome
//! - `wire` - serde DTOs matching the backend JSON contracts

pub mod chat;
pub mod graph;
pub mod preview;
pub mod wire;

// Re-export commonly used types
pub use chat::{AgentAnswer, AgentThought, ChatTurn};
pub use graph::{GraphSnapshot, LineageEdge, LineageNode, NodePosition};
pub use preview::{PlotRecord, PreviewTable, UploadOutcome};
pub use wire::{
    AgentInvokeRequest, AgentResponseDto, AgentThoughtDto, ApiErrorDto, EdgeDto, FinalAnswerDto,
    NodeDto, PlotDto, PreviewDto, ProjectStateDto, UploadResponseDto,
};
