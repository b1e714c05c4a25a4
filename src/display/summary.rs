//! Serializable structural snapshot of a graph, for external tooling.
//!
//! Carries names, declared types, kinds, and dependency edges; compute
//! behaviors are deliberately absent.

use crate::graph::Graph;
use crate::value::ValueType;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub ty: ValueType,
    pub kind: &'static str,
    /// Dependency names, in parameter order.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub nodes: Vec<NodeSummary>,
}

impl GraphSummary {
    /// Snapshots the graph in construction order.
    pub fn of(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| NodeSummary {
                name: node.name.clone(),
                ty: node.ty,
                kind: if node.is_input() { "input" } else { "computed" },
                dependencies: node.params().iter().map(|p| p.name.clone()).collect(),
            })
            .collect();
        Self { nodes }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Graph {
    /// Convenience entry point for [`GraphSummary::of`].
    pub fn summary(&self) -> GraphSummary {
        GraphSummary::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build, Declaration, Param};
    use crate::value::Value;

    #[test]
    fn snapshot_captures_structure() {
        let graph = build(vec![Declaration::new(
            "total",
            ValueType::Float,
            vec![
                Param::new("x", ValueType::Float),
                Param::new("y", ValueType::Float),
            ],
            |_| Ok(Value::Float(0.0)),
        )])
        .unwrap();

        let summary = graph.summary();
        assert_eq!(summary, GraphSummary::of(&graph));
        assert_eq!(summary.nodes.len(), 3);
        assert_eq!(summary.nodes[0].name, "total");
        assert_eq!(summary.nodes[0].kind, "computed");
        assert_eq!(summary.nodes[0].dependencies, ["x", "y"]);
        assert_eq!(summary.nodes[1].kind, "input");

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"total\""));
        assert!(json.contains("\"float\""));
    }
}
