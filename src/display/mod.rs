//! Presentation seams: graph rendering and structural snapshots.
//!
//! Rendering is a pluggable collaborator behind a minimal trait so the
//! engine never depends on a concrete diagramming tool. A render failure
//! never affects graph validity.

pub mod dot;
pub mod summary;

pub use dot::DotRenderer;
pub use summary::{GraphSummary, NodeSummary};

use crate::graph::Graph;
use std::io;

/// A visualization collaborator: receives the graph and a destination
/// identifier, returns an outcome the core does not act on.
pub trait GraphRenderer {
    fn render(&self, graph: &Graph, dest: &str) -> io::Result<()>;
}
