//! The gateway seam - trait over the remote operations

use async_trait::async_trait;
use bytes::Bytes;

use chronicle_core::{AgentResponseDto, ChatTurn, PlotRecord, PreviewTable, ProjectStateDto, UploadOutcome};

use crate::error::Result;

/// The four-plus-one remote operations the client core needs.
///
/// All operations are asynchronous and may fail; failures are reported
/// upward verbatim with enough detail for the caller to decide.
#[async_trait]
pub trait LineageGateway: Send + Sync {
    /// Fetch the current lineage graph payload.
    async fn fetch_state(&self) -> Result<ProjectStateDto>;

    /// Fetch the tabular preview of one node. A vanished node maps to
    /// `GatewayError::NotFound`.
    async fn fetch_preview(&self, node_id: &str) -> Result<PreviewTable>;

    /// Submit a command to the agent. `history` is the caller's pre-call
    /// transcript, available as conversational context to transports that
    /// carry it; the HTTP backend derives context server-side and takes
    /// the input string only.
    async fn invoke_agent(&self, input: &str, history: &[ChatTurn]) -> Result<AgentResponseDto>;

    /// Upload a raw tabular file. Only comma-separated (`.csv`) files are
    /// accepted; anything else is rejected locally as a validation error
    /// without touching the network.
    async fn upload_file(&self, bytes: Bytes, filename: &str) -> Result<UploadOutcome>;

    /// Fetch the project's stored plots.
    async fn fetch_plots(&self) -> Result<Vec<PlotRecord>>;
}

// Shared gateways delegate through the Arc.
#[async_trait]
impl<T: LineageGateway + ?Sized> LineageGateway for std::sync::Arc<T> {
    async fn fetch_state(&self) -> Result<ProjectStateDto> {
        (**self).fetch_state().await
    }

    async fn fetch_preview(&self, node_id: &str) -> Result<PreviewTable> {
        (**self).fetch_preview(node_id).await
    }

    async fn invoke_agent(&self, input: &str, history: &[ChatTurn]) -> Result<AgentResponseDto> {
        (**self).invoke_agent(input, history).await
    }

    async fn upload_file(&self, bytes: Bytes, filename: &str) -> Result<UploadOutcome> {
        (**self).upload_file(bytes, filename).await
    }

    async fn fetch_plots(&self) -> Result<Vec<PlotRecord>> {
        (**self).fetch_plots().await
    }
}
