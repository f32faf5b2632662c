//! session_coordinator - Session state and round-trip sequencing
//!
//! Owns the chat transcript and the current graph snapshot, sequences
//! calls to the gateway, applies projector output, and enforces the
//! ordering rules: at most one in-flight request per lane, stale preview
//! responses discarded by node-id comparison, lineage always refreshed
//! after a command.

mod coordinator;
mod error;
pub mod machine;

pub use coordinator::{NodePreview, SessionCoordinator};
pub use error::{Result, SessionError};
pub use machine::{CommandLane, LaneMachine, LaneTransition, Lanes, SessionEvent, UploadLane};
