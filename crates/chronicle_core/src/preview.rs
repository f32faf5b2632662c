//! Preview types - Tabular previews, plots and upload results

use serde::{Deserialize, Serialize};

/// Tabular preview of one dataset (its head rows).
///
/// Owned wholesale by the session coordinator: replaced on each preview
/// fetch, cleared when no node is selected.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    /// Row-major cells; values are arbitrary JSON scalars.
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl PreviewTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// A plot the agent produced, stored in the project gallery.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlotRecord {
    pub id: String,
    pub image_base64: String,
}

/// Server acknowledgement of a successful file upload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub message: String,
}
