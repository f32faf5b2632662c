//! Lane transitions - event-driven movement of the two lanes

use super::events::SessionEvent;
use super::states::{CommandLane, Lanes, UploadLane};

/// Represents one applied transition.
#[derive(Debug, Clone)]
pub struct LaneTransition {
    /// The lanes before the transition.
    pub from: Lanes,
    /// The lanes after the transition.
    pub to: Lanes,
    /// The event that triggered the transition.
    pub event: SessionEvent,
    /// Whether anything actually changed.
    pub changed: bool,
}

/// State machine for the session's two request lanes.
#[derive(Debug, Clone)]
pub struct LaneMachine {
    lanes: Lanes,
    /// Transition history (limited).
    history: Vec<LaneTransition>,
    max_history: usize,
}

impl Default for LaneMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LaneMachine {
    /// Create a new machine with both lanes idle.
    pub fn new() -> Self {
        Self {
            lanes: Lanes::default(),
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current lane view.
    pub fn lanes(&self) -> Lanes {
        self.lanes
    }

    /// Get the transition history.
    pub fn history(&self) -> &[LaneTransition] {
        &self.history
    }

    /// Handle an event and move the affected lane.
    pub fn handle_event(&mut self, event: SessionEvent) -> LaneTransition {
        let from = self.lanes;
        let to = Self::compute_next(from, &event);
        let changed = from != to;

        self.lanes = to;

        let transition = LaneTransition {
            from,
            to,
            event,
            changed,
        };
        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
        transition
    }

    /// Compute the next lane view given the current one and an event.
    /// Events touch only their own lane; anything else is a no-op.
    fn compute_next(lanes: Lanes, event: &SessionEvent) -> Lanes {
        use SessionEvent::*;

        match event {
            CommandSubmitted if lanes.command == CommandLane::Idle => Lanes {
                command: CommandLane::AwaitingAgentResponse,
                ..lanes
            },
            AgentResponded | AgentFailed { .. }
                if lanes.command == CommandLane::AwaitingAgentResponse =>
            {
                Lanes {
                    command: CommandLane::Idle,
                    ..lanes
                }
            }
            UploadStarted if lanes.upload == UploadLane::Idle => Lanes {
                upload: UploadLane::AwaitingUpload,
                ..lanes
            },
            UploadFinished | UploadFailed { .. }
                if lanes.upload == UploadLane::AwaitingUpload =>
            {
                Lanes {
                    upload: UploadLane::Idle,
                    ..lanes
                }
            }
            _ => lanes,
        }
    }

    /// Check if an event would change anything without applying it.
    pub fn can_transition(&self, event: &SessionEvent) -> bool {
        Self::compute_next(self.lanes, event) != self.lanes
    }

    /// Reset both lanes to idle.
    pub fn reset(&mut self) {
        self.lanes = Lanes::default();
    }
}
