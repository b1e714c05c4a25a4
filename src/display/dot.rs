//! Graphviz DOT output for the dependency graph.

use super::GraphRenderer;
use crate::graph::Graph;
use petgraph::visit::EdgeRef;
use std::fmt::Write as _;
use std::fs;
use std::io;

/// Renders the graph as a Graphviz `dot` document: inputs as boxes,
/// computed nodes as ellipses, edges pointing dependency -> dependent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl DotRenderer {
    pub fn to_dot(&self, graph: &Graph) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {{");
        let _ = writeln!(out, "  rankdir=LR;");

        for node in graph.nodes() {
            let shape = if node.is_input() { "box" } else { "ellipse" };
            let _ = writeln!(
                out,
                "  \"{}\" [shape={}, label=\"{}\\n{}\"];",
                node.name, shape, node.name, node.ty,
            );
        }
        for edge in graph.inner.edge_references() {
            let from = &graph.inner[edge.source()].name;
            let to = &graph.inner[edge.target()].name;
            let _ = writeln!(out, "  \"{from}\" -> \"{to}\";");
        }

        let _ = writeln!(out, "}}");
        out
    }
}

impl GraphRenderer for DotRenderer {
    fn render(&self, graph: &Graph, dest: &str) -> io::Result<()> {
        fs::write(dest, self.to_dot(graph))
    }
}
