//! Gesture types - what the user did, independent of any widget toolkit

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A user gesture, as reported by the rendering layer.
///
/// Delete is its own variant rather than a flag on `NodeClicked`: the
/// delete button is nested inside the node, and modeling it separately is
/// what guarantees a delete never also triggers an activation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gesture {
    /// The node body was clicked.
    NodeClicked { node_id: String },

    /// The delete button inside a node was clicked.
    NodeDeleteClicked { node_id: String },

    /// The chat form was submitted with the given text.
    ChatSubmitted { text: String },

    /// The upload button was clicked.
    UploadClicked,
}

/// The file currently picked in the upload widget, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSelection {
    pub filename: String,
    pub bytes: Bytes,
}

impl FileSelection {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}
