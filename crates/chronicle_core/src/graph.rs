//! Graph types - Lineage nodes, edges and snapshots
//!
//! A snapshot is one immutable, internally consistent view of the lineage
//! graph. The renderer only ever sees whole snapshots; it never observes a
//! half-applied update.

use serde::{Deserialize, Serialize};

/// Position of a node on the rendering surface, assigned by the projector.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

impl NodePosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A dataset in the lineage graph.
///
/// Created when the server first reports it, gone when the server stops
/// reporting it. The client never deletes a node itself, only requests
/// deletion through an agent command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineageNode {
    /// Unique id, stable across fetches.
    pub id: String,

    /// Display label (dataset name plus shape, server-formatted).
    pub label: String,

    /// Whether this node is the active dataset.
    pub is_active: bool,

    /// Layout position assigned by the projector.
    pub position: NodePosition,
}

/// A derivation relationship between two datasets.
///
/// Identity is the `(source_id, target_id)` pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LineageEdge {
    pub source_id: String,
    pub target_id: String,

    /// The operation that derived the target from the source.
    pub label: String,
}

impl LineageEdge {
    /// Render-layer identity, the concatenation of source and target ids.
    pub fn render_id(&self) -> String {
        format!("{}-{}", self.source_id, self.target_id)
    }
}

/// The full lineage graph at one instant.
///
/// Immutable once produced; a new snapshot always replaces the old one
/// atomically from the renderer's point of view.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<LineageEdge>,

    /// Id of the active node, if any. Invariant: when `Some`, it names a
    /// node present in `nodes`.
    pub active_node_id: Option<String>,
}

impl GraphSnapshot {
    /// An empty snapshot with no active node.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Whether an edge should be rendered highlighted/animated.
    ///
    /// Derived on read, not stored: an edge is highlighted iff its target
    /// is the active node.
    pub fn edge_is_highlighted(&self, edge: &LineageEdge) -> bool {
        self.active_node_id.as_deref() == Some(edge.target_id.as_str())
    }
}
