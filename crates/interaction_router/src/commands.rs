//! Command-string builders for gesture-generated agent prompts

/// Prompt asking the agent to make `node_id` the active dataset.
pub fn activate_command(node_id: &str) -> String {
    format!("Set {node_id} as the active dataset.")
}

/// Prompt asking the agent to delete `node_id`.
///
/// This is the literal tool-call form the agent recognizes; the node is
/// only removed from the graph once a later refresh stops reporting it.
pub fn delete_command(node_id: &str) -> String {
    format!("delete_dataframe('{node_id}')")
}
