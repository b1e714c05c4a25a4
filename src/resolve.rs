//! Computes the minimal closure of nodes needed for a set of outputs.
//!
//! A backward DFS from each requested name, in request order, with a
//! shared visited set. Computed nodes accumulate in post-order, which is
//! a valid topological order: every node appears strictly after all of
//! its dependencies. Ties among independent nodes break by first
//! discovery, so the result is deterministic for a given request order.

use crate::graph::{Graph, NodeId, NodeKind};
use log::debug;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown node '{name}' requested")]
    UnknownNode { name: String },
    #[error("no output names requested")]
    EmptyRequest,
}

/// The minimal subgraph for one request, split into computed nodes (in
/// evaluation order) and externally supplied leaves. Transient; owned by
/// one resolve call and discarded after the matching execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Computed node names, each strictly after all of its dependencies.
    pub required_computed: Vec<String>,
    /// Input node names reachable from the request, in discovery order.
    pub required_inputs: Vec<String>,
}

pub fn resolve(graph: &Graph, final_vars: &[&str]) -> Result<ResolutionResult, ResolveError> {
    if final_vars.is_empty() {
        return Err(ResolveError::EmptyRequest);
    }

    let mut visited = HashSet::with_capacity(graph.node_count());
    let mut result = ResolutionResult::default();
    for &name in final_vars {
        let id = graph.id_of(name).ok_or_else(|| ResolveError::UnknownNode {
            name: name.to_string(),
        })?;
        visit(graph, id, &mut visited, &mut result);
    }

    debug!(
        "resolved {:?}: {} computed, {} inputs",
        final_vars,
        result.required_computed.len(),
        result.required_inputs.len(),
    );
    Ok(result)
}

fn visit(graph: &Graph, id: NodeId, visited: &mut HashSet<NodeId>, result: &mut ResolutionResult) {
    if !visited.insert(id) {
        return;
    }
    let node = graph.node_by_id(id);
    match &node.kind {
        NodeKind::Input => result.required_inputs.push(node.name.clone()),
        NodeKind::Computed { params, .. } => {
            for param in params {
                let dep = graph
                    .id_of(&param.name)
                    .expect("BUG: parameter resolved at build time");
                visit(graph, dep, visited, result);
            }
            result.required_computed.push(node.name.clone());
        }
    }
}
