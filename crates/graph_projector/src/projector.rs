//! Projection logic - grid layout, active marking, edge hygiene

use std::collections::HashSet;

use log::warn;

use chronicle_core::{GraphSnapshot, LineageEdge, LineageNode, NodePosition, ProjectStateDto};

/// Fixed column count of the layout grid.
pub const GRID_COLUMNS: usize = 4;
/// Horizontal distance between grid columns, in render units.
pub const COLUMN_SPACING: f64 = 250.0;
/// Vertical distance between grid rows, in render units.
pub const ROW_SPACING: f64 = 150.0;

/// Convert a raw project-state payload into a positioned, styled snapshot.
///
/// Nodes keep their payload arrival order and are placed on a fixed-width
/// grid, so re-projection of an unchanged node set never perturbs existing
/// positions. Exactly the node matching the reported active id is marked
/// active. Edges that reference missing nodes are dropped; duplicate edges
/// are deduplicated with last-write-wins on the label.
pub fn project(raw: &ProjectStateDto) -> GraphSnapshot {
    let node_ids: HashSet<&str> = raw.nodes.iter().map(|n| n.id.as_str()).collect();

    // An active id that names no node in the same payload is a server
    // contract violation; fall back to no active node.
    let active_node_id = match raw.active_node_id.as_deref() {
        Some(id) if node_ids.contains(id) => Some(id.to_string()),
        Some(id) => {
            warn!("active_node_id '{id}' not present in payload node set; treating as none");
            None
        }
        None => None,
    };

    let nodes = raw
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| LineageNode {
            id: node.id.clone(),
            label: node.label.clone(),
            is_active: active_node_id.as_deref() == Some(node.id.as_str()),
            position: grid_position(index),
        })
        .collect();

    let mut edges: Vec<LineageEdge> = Vec::with_capacity(raw.edges.len());
    for edge in &raw.edges {
        if !node_ids.contains(edge.source.as_str()) || !node_ids.contains(edge.target.as_str()) {
            warn!(
                "dropping dangling edge {} -> {} ('{}')",
                edge.source, edge.target, edge.label
            );
            continue;
        }
        if let Some(existing) = edges
            .iter_mut()
            .find(|e| e.source_id == edge.source && e.target_id == edge.target)
        {
            // Same (source, target) pair seen again: keep the first slot,
            // take the later label.
            existing.label = edge.label.clone();
            continue;
        }
        edges.push(LineageEdge {
            source_id: edge.source.clone(),
            target_id: edge.target.clone(),
            label: edge.label.clone(),
        });
    }

    GraphSnapshot {
        nodes,
        edges,
        active_node_id,
    }
}

fn grid_position(index: usize) -> NodePosition {
    NodePosition {
        x: (index % GRID_COLUMNS) as f64 * COLUMN_SPACING,
        y: (index / GRID_COLUMNS) as f64 * ROW_SPACING,
    }
}
