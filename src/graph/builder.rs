//! Turns a flat collection of declarations into a validated [`Graph`].
//!
//! Any parameter name that does not match a declaration becomes a
//! synthesized `Input` node, typed from its first reference. Construction
//! fails entirely on the first structural problem; there is no partially
//! usable graph.

use super::dag::{Graph, NodeId};
use super::node::{Declaration, Node, NodeKind};
use crate::value::ValueType;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("duplicate node '{name}'")]
    DuplicateNode { name: String },
    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
    #[error("conflicting types for '{name}': {first} vs {second}")]
    TypeConflict {
        name: String,
        first: ValueType,
        second: ValueType,
    },
    #[error("computed node '{name}' declares no dependencies")]
    NoDependencies { name: String },
}

/// Builds an immutable graph from a collection of declarations.
pub fn build(declarations: Vec<Declaration>) -> Result<Graph, BuildError> {
    let mut graph = Graph::default();

    // Pass 1: declared nodes, in input order.
    for decl in &declarations {
        if graph.contains(&decl.name) {
            return Err(BuildError::DuplicateNode {
                name: decl.name.clone(),
            });
        }
        if decl.params.is_empty() {
            return Err(BuildError::NoDependencies {
                name: decl.name.clone(),
            });
        }
        graph.add_node(Node {
            name: decl.name.clone(),
            ty: decl.returns,
            kind: NodeKind::Computed {
                compute: decl.compute.clone(),
                params: decl.params.iter().cloned().collect(),
            },
        });
    }

    // Pass 2: resolve parameters, synthesizing inputs at first reference
    // and reconciling declared types across references.
    for decl in &declarations {
        let dependent = graph
            .id_of(&decl.name)
            .expect("BUG: declared node added in pass 1");
        for param in &decl.params {
            let dependency = match graph.id_of(&param.name) {
                Some(id) => {
                    let (existing_ty, is_input) = {
                        let node = graph.node_by_id(id);
                        (node.ty, node.is_input())
                    };
                    if is_input {
                        match existing_ty.unify(param.ty) {
                            Some(unified) => {
                                if unified != existing_ty {
                                    graph.retype_node(id, unified);
                                }
                            }
                            None => {
                                return Err(BuildError::TypeConflict {
                                    name: param.name.clone(),
                                    first: existing_ty,
                                    second: param.ty,
                                })
                            }
                        }
                    } else if !param.ty.accepts(existing_ty) {
                        // Consumer-declared type must accept the
                        // producer's declared result type.
                        return Err(BuildError::TypeConflict {
                            name: param.name.clone(),
                            first: existing_ty,
                            second: param.ty,
                        });
                    }
                    id
                }
                None => graph.add_node(Node {
                    name: param.name.clone(),
                    ty: param.ty,
                    kind: NodeKind::Input,
                }),
            };
            graph.add_edge(dependency, dependent);
        }
    }

    check_acyclic(&graph)?;

    debug!(
        "built graph: {} nodes ({} declared, {} synthesized inputs)",
        graph.node_count(),
        declarations.len(),
        graph.node_count() - declarations.len(),
    );
    Ok(graph)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    New,
    Visiting,
    Visited,
}

/// Three-color DFS over the whole graph. A back-edge to an in-progress
/// node is a cycle; the error carries the full path around it.
fn check_acyclic(graph: &Graph) -> Result<(), BuildError> {
    let mut state = vec![VisitState::New; graph.node_count()];
    let mut path = Vec::new();

    for id in graph.ids() {
        if state[id.index()] == VisitState::New {
            visit(graph, id, &mut state, &mut path)?;
        }
    }
    Ok(())
}

fn visit(
    graph: &Graph,
    id: NodeId,
    state: &mut Vec<VisitState>,
    path: &mut Vec<NodeId>,
) -> Result<(), BuildError> {
    match state[id.index()] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            let start = path.iter().position(|&p| p == id).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..]
                .iter()
                .map(|&p| graph.node_by_id(p).name.clone())
                .collect();
            cycle.push(graph.node_by_id(id).name.clone());
            return Err(BuildError::CyclicDependency { cycle });
        }
        VisitState::New => state[id.index()] = VisitState::Visiting,
    }
    path.push(id);

    for param in graph.node_by_id(id).params() {
        let dep = graph
            .id_of(&param.name)
            .expect("BUG: parameter resolved in pass 2");
        visit(graph, dep, state, path)?;
    }

    path.pop();
    state[id.index()] = VisitState::Visited;
    Ok(())
}
