//! graph_projector - Raw lineage payload to renderable snapshot
//!
//! `project` is a pure function: deterministic for a given input, no side
//! effects beyond contract-violation logging. The renderer consumes the
//! resulting `GraphSnapshot` as-is.

mod projector;

pub use projector::{project, COLUMN_SPACING, GRID_COLUMNS, ROW_SPACING};
