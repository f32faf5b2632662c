//! Integration tests for SessionCoordinator with a scripted fake gateway
//!
//! The fake resolves calls in a test-controlled order, which is what the
//! race rules (stale preview discard, lane serialization) need.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, Notify};

use chronicle_core::{
    AgentResponseDto, ChatTurn, EdgeDto, FinalAnswerDto, NodeDto, PlotRecord, PreviewTable,
    ProjectStateDto, UploadOutcome,
};
use interaction_router::{FileSelection, Gesture};
use lineage_gateway::{GatewayError, LineageGateway};
use session_coordinator::{SessionCoordinator, SessionError};

#[derive(Default)]
struct FakeGateway {
    /// Queued project-state payloads; the last one repeats once drained.
    states: Mutex<VecDeque<ProjectStateDto>>,
    last_state: Mutex<ProjectStateDto>,
    state_fetches: AtomicUsize,

    /// Per-node preview tables, plus optional gates that hold a response
    /// until the test releases it.
    previews: Mutex<HashMap<String, PreviewTable>>,
    preview_gates: Mutex<HashMap<String, Arc<Notify>>>,

    /// Queued agent replies; errors are scripted as messages.
    agent_replies: Mutex<VecDeque<Result<AgentResponseDto, String>>>,
    agent_gate: Option<Arc<Notify>>,
    /// Recorded (input, history) per invocation.
    agent_calls: Mutex<Vec<(String, Vec<ChatTurn>)>>,

    upload_replies: Mutex<VecDeque<Result<UploadOutcome, GatewayError>>>,
}

impl FakeGateway {
    fn push_state(&self, state: ProjectStateDto) {
        self.states.try_lock().unwrap().push_back(state);
    }

    fn push_agent_reply(&self, reply: Result<AgentResponseDto, String>) {
        self.agent_replies.try_lock().unwrap().push_back(reply);
    }

    fn push_upload_reply(&self, reply: Result<UploadOutcome, GatewayError>) {
        self.upload_replies.try_lock().unwrap().push_back(reply);
    }

    fn set_preview(&self, node_id: &str, table: PreviewTable) {
        self.previews
            .try_lock()
            .unwrap()
            .insert(node_id.to_string(), table);
    }

    fn gate_preview(&self, node_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.preview_gates
            .try_lock()
            .unwrap()
            .insert(node_id.to_string(), gate.clone());
        gate
    }

    async fn recorded_agent_calls(&self) -> Vec<(String, Vec<ChatTurn>)> {
        self.agent_calls.lock().await.clone()
    }
}

#[async_trait]
impl LineageGateway for FakeGateway {
    async fn fetch_state(&self) -> lineage_gateway::Result<ProjectStateDto> {
        self.state_fetches.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.states.lock().await;
        if let Some(state) = queue.pop_front() {
            *self.last_state.lock().await = state.clone();
            Ok(state)
        } else {
            Ok(self.last_state.lock().await.clone())
        }
    }

    async fn fetch_preview(&self, node_id: &str) -> lineage_gateway::Result<PreviewTable> {
        let gate = self.preview_gates.lock().await.get(node_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.previews
            .lock()
            .await
            .get(node_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                node_id: node_id.to_string(),
            })
    }

    async fn invoke_agent(
        &self,
        input: &str,
        history: &[ChatTurn],
    ) -> lineage_gateway::Result<AgentResponseDto> {
        self.agent_calls
            .lock()
            .await
            .push((input.to_string(), history.to_vec()));
        if let Some(gate) = &self.agent_gate {
            gate.notified().await;
        }
        let reply = self.agent_replies.lock().await.pop_front();
        match reply {
            Some(Ok(dto)) => Ok(dto),
            Some(Err(message)) => Err(GatewayError::Server {
                status: 500,
                message,
            }),
            None => Ok(text_reply("ok")),
        }
    }

    async fn upload_file(
        &self,
        _bytes: Bytes,
        filename: &str,
    ) -> lineage_gateway::Result<UploadOutcome> {
        match self.upload_replies.lock().await.pop_front() {
            Some(reply) => reply,
            None => Ok(UploadOutcome {
                message: format!("'{filename}' registered."),
            }),
        }
    }

    async fn fetch_plots(&self) -> lineage_gateway::Result<Vec<PlotRecord>> {
        Ok(vec![PlotRecord {
            id: "plot_1".to_string(),
            image_base64: "aW1n".to_string(),
        }])
    }
}

fn text_reply(text: &str) -> AgentResponseDto {
    AgentResponseDto {
        final_answer: FinalAnswerDto::Text(text.to_string()),
        thoughts: Vec::new(),
    }
}

fn node(id: &str) -> NodeDto {
    NodeDto {
        id: id.to_string(),
        label: id.to_string(),
    }
}

fn state(nodes: Vec<NodeDto>, edges: Vec<EdgeDto>, active: Option<&str>) -> ProjectStateDto {
    ProjectStateDto {
        nodes,
        edges,
        active_node_id: active.map(str::to_string),
    }
}

fn preview(column: &str) -> PreviewTable {
    PreviewTable {
        columns: vec![column.to_string()],
        rows: vec![vec![serde_json::json!(1)]],
    }
}

fn csv_selection() -> FileSelection {
    FileSelection::new("sales.csv", "region,sales\nSeoul,100\n".as_bytes().to_vec())
}

#[tokio::test]
async fn test_command_round_trip_appends_turns_and_refreshes() {
    let gateway = FakeGateway::default();
    gateway.push_agent_reply(Ok(text_reply("n2 is now active.")));
    gateway.push_state(state(vec![node("n1"), node("n2")], vec![], Some("n2")));
    let coordinator = SessionCoordinator::new(gateway);

    coordinator
        .on_user_command("Set n2 as the active dataset.")
        .await
        .unwrap();

    let transcript = coordinator.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert!(transcript[0].is_user());
    assert_eq!(transcript[1].text(), Some("n2 is now active."));

    // Exactly the reported node is active after the refresh.
    let snapshot = coordinator.snapshot().await;
    let active: Vec<&str> = snapshot
        .nodes
        .iter()
        .filter(|n| n.is_active)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(active, vec!["n2"]);
    assert!(coordinator.lanes().await.accepts_command());
}

#[tokio::test]
async fn test_agent_failure_stays_visible_and_still_refreshes() {
    let gateway = FakeGateway::default();
    gateway.push_agent_reply(Err("agent exploded".to_string()));
    let coordinator = SessionCoordinator::new(gateway);

    coordinator.on_user_command("do something").await.unwrap();

    let transcript = coordinator.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert!(transcript[0].is_user());
    let error_text = transcript[1].text().unwrap();
    assert!(error_text.contains("agent exploded"), "got: {error_text}");

    // The lane is released again after the failure.
    assert!(coordinator.lanes().await.accepts_command());
}

#[tokio::test]
async fn test_agent_receives_pre_call_transcript_with_new_turn() {
    let gateway = Arc::new(FakeGateway::default());
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator.on_user_command("first").await.unwrap();
    coordinator.on_user_command("second").await.unwrap();

    let calls = gateway.recorded_agent_calls().await;
    assert_eq!(calls.len(), 2);
    // First call: just the new user turn.
    assert_eq!(calls[0].1.len(), 1);
    assert_eq!(calls[0].1[0].text(), Some("first"));
    // Second call: prior exchange plus the new user turn.
    assert_eq!(calls[1].1.len(), 3);
    assert_eq!(calls[1].1[2].text(), Some("second"));
}

#[tokio::test]
async fn test_second_command_rejected_while_first_in_flight() {
    let gate = Arc::new(Notify::new());
    let gateway = FakeGateway {
        agent_gate: Some(gate.clone()),
        ..FakeGateway::default()
    };
    let coordinator = Arc::new(SessionCoordinator::new(gateway));

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.on_user_command("slow one").await })
    };
    // Let the first command claim the lane.
    tokio::task::yield_now().await;
    while coordinator.lanes().await.accepts_command() {
        tokio::task::yield_now().await;
    }

    let second = coordinator.on_user_command("too eager").await;
    assert!(matches!(second, Err(SessionError::CommandInFlight)));

    gate.notify_one();
    first.await.unwrap().unwrap();
    assert!(coordinator.lanes().await.accepts_command());
}

#[tokio::test]
async fn test_empty_command_rejected_locally() {
    let gateway = Arc::new(FakeGateway::default());
    let coordinator = SessionCoordinator::new(gateway.clone());

    let result = coordinator.on_user_command("   ").await;
    assert!(matches!(result, Err(SessionError::EmptyCommand)));
    assert!(coordinator.transcript().await.is_empty());
    assert!(gateway.recorded_agent_calls().await.is_empty());
    assert_eq!(gateway.state_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_preview_is_discarded() {
    let gateway = FakeGateway::default();
    gateway.set_preview("a", preview("from_a"));
    gateway.set_preview("b", preview("from_b"));
    let gate_a = gateway.gate_preview("a");
    let coordinator = Arc::new(SessionCoordinator::new(gateway));

    // Click A; its preview hangs on the gate.
    let slow = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.on_preview_request("a").await })
    };
    tokio::task::yield_now().await;

    // Click B; it resolves immediately.
    coordinator.on_preview_request("b").await.unwrap();
    assert_eq!(
        coordinator.preview().await.unwrap().node_id,
        "b".to_string()
    );

    // Now let A's response land - it must be discarded.
    gate_a.notify_one();
    slow.await.unwrap().unwrap();

    let displayed = coordinator.preview().await.unwrap();
    assert_eq!(displayed.node_id, "b");
    assert_eq!(displayed.table.columns, vec!["from_b"]);
}

#[tokio::test]
async fn test_preview_failure_leaves_prior_preview() {
    let gateway = FakeGateway::default();
    gateway.set_preview("a", preview("from_a"));
    let coordinator = SessionCoordinator::new(gateway);

    coordinator.on_preview_request("a").await.unwrap();
    let result = coordinator.on_preview_request("missing").await;
    assert!(matches!(
        result,
        Err(SessionError::Gateway(GatewayError::NotFound { .. }))
    ));

    // "missing" is now the selected node, so the stale-but-displayed
    // preview for "a" remains until something newer succeeds.
    assert_eq!(coordinator.preview().await.unwrap().node_id, "a");
}

#[tokio::test]
async fn test_clear_selection_clears_preview() {
    let gateway = FakeGateway::default();
    gateway.set_preview("a", preview("from_a"));
    let coordinator = SessionCoordinator::new(gateway);

    coordinator.on_preview_request("a").await.unwrap();
    coordinator.clear_selection().await;
    assert!(coordinator.preview().await.is_none());
}

#[tokio::test]
async fn test_delete_flows_through_command_and_refresh() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.push_state(state(
        vec![node("n1"), node("n2")],
        vec![EdgeDto {
            source: "n1".to_string(),
            target: "n2".to_string(),
            label: "filter".to_string(),
        }],
        None,
    ));
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator.on_delete_request("n3").await.unwrap();

    let calls = gateway.recorded_agent_calls().await;
    assert_eq!(calls[0].0, "delete_dataframe('n3')");

    // The refresh omitted n3: it is absent, and so are edges touching it.
    let snapshot = coordinator.snapshot().await;
    assert!(!snapshot.contains_node("n3"));
    assert!(snapshot
        .edges
        .iter()
        .all(|e| e.source_id != "n3" && e.target_id != "n3"));
}

#[tokio::test]
async fn test_node_click_issues_command_and_preview() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_preview("n2", preview("head"));
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator.on_node_click("n2").await.unwrap();

    let calls = gateway.recorded_agent_calls().await;
    assert_eq!(calls[0].0, "Set n2 as the active dataset.");
    assert_eq!(coordinator.preview().await.unwrap().node_id, "n2");
}

#[tokio::test]
async fn test_upload_success_clears_selection_and_refreshes() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.push_state(state(vec![node("df_initial")], vec![], None));
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator.on_file_selected(csv_selection()).await;
    assert!(coordinator.upload_enabled().await);

    let outcome = coordinator.on_upload_request().await.unwrap();
    assert!(outcome.message.contains("sales.csv"));
    assert!(!coordinator.upload_enabled().await);
    assert_eq!(gateway.state_fetches.load(Ordering::SeqCst), 1);
    assert!(coordinator.snapshot().await.contains_node("df_initial"));
    // Upload never touches the transcript.
    assert!(coordinator.transcript().await.is_empty());
}

#[tokio::test]
async fn test_upload_validation_failure_triggers_no_refresh() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.push_upload_reply(Err(GatewayError::Validation(
        "only .csv files are accepted".to_string(),
    )));
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator
        .on_file_selected(FileSelection::new("notes.txt", b"hello".to_vec()))
        .await;
    let result = coordinator.on_upload_request().await;
    assert!(matches!(
        result,
        Err(SessionError::Gateway(GatewayError::Validation(_)))
    ));

    assert_eq!(gateway.state_fetches.load(Ordering::SeqCst), 0);
    assert!(coordinator.transcript().await.is_empty());
    assert!(coordinator
        .upload_error()
        .await
        .unwrap()
        .contains("only .csv files"));

    // Picking a new file clears the error state.
    coordinator.on_file_selected(csv_selection()).await;
    assert!(coordinator.upload_error().await.is_none());
}

#[tokio::test]
async fn test_upload_without_selection_is_rejected() {
    let coordinator = SessionCoordinator::new(FakeGateway::default());
    let result = coordinator.on_upload_request().await;
    assert!(matches!(result, Err(SessionError::NoFileSelected)));
}

#[tokio::test]
async fn test_gesture_dispatch() {
    let gateway = Arc::new(FakeGateway::default());
    let coordinator = SessionCoordinator::new(gateway.clone());

    coordinator
        .on_gesture(Gesture::ChatSubmitted {
            text: "show the head".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(gateway.recorded_agent_calls().await[0].0, "show the head");

    // Upload click without a selection routes to a no-op.
    coordinator.on_gesture(Gesture::UploadClicked).await.unwrap();
    assert_eq!(gateway.state_fetches.load(Ordering::SeqCst), 1); // only the command refresh

    coordinator
        .on_gesture(Gesture::NodeDeleteClicked {
            node_id: "n9".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        gateway.recorded_agent_calls().await[1].0,
        "delete_dataframe('n9')"
    );
}

#[tokio::test]
async fn test_refresh_plots_replaces_gallery() {
    let coordinator = SessionCoordinator::new(FakeGateway::default());
    assert!(coordinator.plots().await.is_empty());

    coordinator.refresh_plots().await.unwrap();
    let plots = coordinator.plots().await;
    assert_eq!(plots.len(), 1);
    assert_eq!(plots[0].id, "plot_1");
}
