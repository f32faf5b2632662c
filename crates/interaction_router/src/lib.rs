//! interaction_router - UI gestures to agent commands
//!
//! Owns no state and performs no network calls: every gesture maps to
//! either an agent command string or a direct side-effecting request that
//! the session coordinator carries out.

mod commands;
mod gestures;
mod router;

pub use commands::{activate_command, delete_command};
pub use gestures::{FileSelection, Gesture};
pub use router::{route, upload_enabled, RoutedAction};
