//! Routing - translate gestures into effects for the coordinator

use crate::commands::{activate_command, delete_command};
use crate::gestures::{FileSelection, Gesture};

/// The effect a gesture translates into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutedAction {
    /// Submit the command string to the agent.
    Command(String),

    /// Submit the command and, in parallel, fetch the node's preview.
    /// The two results are independent and may arrive in either order.
    CommandWithPreview { command: String, node_id: String },

    /// Upload the currently selected file.
    Upload,

    /// Nothing to do (blank input, upload without a selection).
    Ignore,
}

/// Map a gesture to its effect. Pure translation; the coordinator decides
/// sequencing and failure handling.
pub fn route(gesture: Gesture, selection: Option<&FileSelection>) -> RoutedAction {
    match gesture {
        Gesture::NodeClicked { node_id } => RoutedAction::CommandWithPreview {
            command: activate_command(&node_id),
            node_id,
        },
        Gesture::NodeDeleteClicked { node_id } => {
            RoutedAction::Command(delete_command(&node_id))
        }
        Gesture::ChatSubmitted { text } => {
            if text.trim().is_empty() {
                RoutedAction::Ignore
            } else {
                // Raw user text, verbatim; the server owns safe interpretation.
                RoutedAction::Command(text)
            }
        }
        Gesture::UploadClicked => {
            if upload_enabled(selection) {
                RoutedAction::Upload
            } else {
                RoutedAction::Ignore
            }
        }
    }
}

/// Whether the upload button should be enabled.
pub fn upload_enabled(selection: Option<&FileSelection>) -> bool {
    selection.is_some()
}
