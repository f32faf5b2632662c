//! Session Coordinator - owns the transcript and the published snapshot

use log::{debug, warn};
use tokio::sync::RwLock;

use chronicle_core::{ChatTurn, GraphSnapshot, PlotRecord, PreviewTable, UploadOutcome};
use graph_projector::project;
use interaction_router::{
    activate_command, delete_command, route, upload_enabled, FileSelection, Gesture, RoutedAction,
};
use lineage_gateway::LineageGateway;

use crate::error::{Result, SessionError};
use crate::machine::{LaneMachine, SessionEvent};

/// The preview currently on display, tagged with the node it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePreview {
    pub node_id: String,
    pub table: PreviewTable,
}

/// Everything the coordinator owns. Held behind one lock; the lock is
/// only taken across synchronous mutations, never across a network call.
#[derive(Debug, Default)]
struct SessionInner {
    machine: LaneMachine,
    transcript: Vec<ChatTurn>,
    snapshot: GraphSnapshot,
    preview: Option<NodePreview>,
    /// The node the user most recently asked a preview for. Preview
    /// responses are applied only while their tag still matches this.
    selected_node: Option<String>,
    plots: Vec<PlotRecord>,
    selection: Option<FileSelection>,
    upload_error: Option<String>,
}

/// Session Coordinator - sequences gateway calls, applies projector
/// output, and reconciles transcript and graph after every round-trip.
pub struct SessionCoordinator<G: LineageGateway> {
    gateway: G,
    inner: RwLock<SessionInner>,
}

impl<G: LineageGateway> SessionCoordinator<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            inner: RwLock::new(SessionInner::default()),
        }
    }

    // ========== Gesture dispatch ==========

    /// Route a UI gesture into its effect and carry it out.
    pub async fn on_gesture(&self, gesture: Gesture) -> Result<()> {
        let selection = self.inner.read().await.selection.clone();
        match route(gesture, selection.as_ref()) {
            RoutedAction::Command(command) => self.on_user_command(&command).await,
            RoutedAction::CommandWithPreview { node_id, .. } => {
                self.on_node_click(&node_id).await
            }
            RoutedAction::Upload => self.on_upload_request().await.map(|_| ()),
            RoutedAction::Ignore => Ok(()),
        }
    }

    // ========== Command lane ==========

    /// Submit a chat command to the agent.
    ///
    /// The user turn is appended optimistically and survives a failed
    /// call; a failure is appended as a synthetic agent turn, so this
    /// returns `Ok` once the submission itself was accepted. The lineage
    /// graph is refreshed afterward regardless of outcome, because a
    /// command may have mutated server-side state even on partial failure.
    pub async fn on_user_command(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyCommand);
        }

        // Claim the lane and append the user turn in one critical section.
        let history = {
            let mut inner = self.inner.write().await;
            if !inner.machine.lanes().accepts_command() {
                return Err(SessionError::CommandInFlight);
            }
            inner.machine.handle_event(SessionEvent::CommandSubmitted);
            inner.transcript.push(ChatTurn::user(text));
            // Pre-call transcript, the just-added turn included.
            inner.transcript.clone()
        };

        let reply = self.gateway.invoke_agent(text, &history).await;

        {
            let mut inner = self.inner.write().await;
            match reply {
                Ok(dto) => {
                    inner.transcript.push(dto.into_agent_turn());
                    inner.machine.handle_event(SessionEvent::AgentResponded);
                }
                Err(err) => {
                    warn!("agent call failed: {err}");
                    inner
                        .transcript
                        .push(ChatTurn::agent_error(format!("Agent call failed: {err}")));
                    inner.machine.handle_event(SessionEvent::AgentFailed {
                        error: err.to_string(),
                    });
                }
            }
        }

        if let Err(err) = self.refresh_lineage().await {
            warn!("post-command lineage refresh failed: {err}");
        }
        Ok(())
    }

    /// A node was clicked: ask the agent to activate it and, in parallel,
    /// fetch its preview. The two results are independent and may land in
    /// either order.
    pub async fn on_node_click(&self, node_id: &str) -> Result<()> {
        let command = activate_command(node_id);
        let (command_result, preview_result) = tokio::join!(
            self.on_user_command(&command),
            self.on_preview_request(node_id)
        );
        if let Err(err) = preview_result {
            warn!("preview fetch for {node_id} failed: {err}");
        }
        command_result
    }

    /// A node's delete button was clicked. No optimistic removal: the
    /// node disappears only once the post-command refresh omits it.
    pub async fn on_delete_request(&self, node_id: &str) -> Result<()> {
        let command = delete_command(node_id);
        self.on_user_command(&command).await
    }

    // ========== Preview ==========

    /// Fetch the preview of `node_id` and display it, unless the user has
    /// since selected a different node (last-intent-wins).
    pub async fn on_preview_request(&self, node_id: &str) -> Result<()> {
        {
            let mut inner = self.inner.write().await;
            inner.selected_node = Some(node_id.to_string());
        }

        let fetched = self.gateway.fetch_preview(node_id).await;

        let mut inner = self.inner.write().await;
        if inner.selected_node.as_deref() != Some(node_id) {
            debug!("discarding stale preview for {node_id}");
            return Ok(());
        }
        match fetched {
            Ok(table) => {
                inner.preview = Some(NodePreview {
                    node_id: node_id.to_string(),
                    table,
                });
                Ok(())
            }
            // Prior preview stays untouched; the caller shows a notice.
            Err(err) => Err(err.into()),
        }
    }

    /// Deselect the current node and clear the preview panel.
    pub async fn clear_selection(&self) {
        let mut inner = self.inner.write().await;
        inner.selected_node = None;
        inner.preview = None;
    }

    // ========== Upload lane ==========

    /// Record a newly picked file; clears any prior upload error.
    pub async fn on_file_selected(&self, selection: FileSelection) {
        let mut inner = self.inner.write().await;
        inner.selection = Some(selection);
        inner.upload_error = None;
    }

    /// Upload the currently selected file.
    ///
    /// On success the selection is cleared and the lineage graph
    /// refreshed; on failure the error is recorded for display and the
    /// transcript and graph are left untouched.
    pub async fn on_upload_request(&self) -> Result<UploadOutcome> {
        let selection = {
            let mut inner = self.inner.write().await;
            let selection = inner.selection.clone().ok_or(SessionError::NoFileSelected)?;
            if !inner.machine.lanes().accepts_upload() {
                return Err(SessionError::UploadInFlight);
            }
            inner.machine.handle_event(SessionEvent::UploadStarted);
            selection
        };

        let uploaded = self
            .gateway
            .upload_file(selection.bytes.clone(), &selection.filename)
            .await;

        match uploaded {
            Ok(outcome) => {
                {
                    let mut inner = self.inner.write().await;
                    inner.selection = None;
                    inner.upload_error = None;
                    inner.machine.handle_event(SessionEvent::UploadFinished);
                }
                if let Err(err) = self.refresh_lineage().await {
                    warn!("post-upload lineage refresh failed: {err}");
                }
                Ok(outcome)
            }
            Err(err) => {
                let mut inner = self.inner.write().await;
                inner.upload_error = Some(err.to_string());
                inner.machine.handle_event(SessionEvent::UploadFailed {
                    error: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    // ========== Reconciliation ==========

    /// Fetch the lineage state and publish a fresh snapshot atomically.
    ///
    /// Concurrent refreshes are allowed; whichever snapshot arrives last
    /// wins, which is acceptable for idempotently re-derivable state.
    pub async fn refresh_lineage(&self) -> Result<()> {
        let raw = self.gateway.fetch_state().await?;
        let snapshot = project(&raw);
        let mut inner = self.inner.write().await;
        inner.snapshot = snapshot;
        Ok(())
    }

    /// Fetch the stored plots and replace the gallery.
    pub async fn refresh_plots(&self) -> Result<()> {
        let plots = self.gateway.fetch_plots().await?;
        let mut inner = self.inner.write().await;
        inner.plots = plots;
        Ok(())
    }

    // ========== Read accessors ==========

    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.inner.read().await.transcript.clone()
    }

    pub async fn snapshot(&self) -> GraphSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn preview(&self) -> Option<NodePreview> {
        self.inner.read().await.preview.clone()
    }

    pub async fn plots(&self) -> Vec<PlotRecord> {
        self.inner.read().await.plots.clone()
    }

    pub async fn upload_error(&self) -> Option<String> {
        self.inner.read().await.upload_error.clone()
    }

    pub async fn upload_enabled(&self) -> bool {
        upload_enabled(self.inner.read().await.selection.as_ref())
    }

    /// Current lane view, for disabling submit controls.
    pub async fn lanes(&self) -> crate::machine::Lanes {
        self.inner.read().await.machine.lanes()
    }
}
