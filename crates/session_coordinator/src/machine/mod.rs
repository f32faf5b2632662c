//! Lane state machine module
//!
//! Two independent request lanes (chat command, upload), each strictly
//! serialized, free to overlap with one another.

mod events;
mod states;
mod transitions;

pub use events::SessionEvent;
pub use states::{CommandLane, Lanes, UploadLane};
pub use transitions::{LaneMachine, LaneTransition};
