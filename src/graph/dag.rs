//! The immutable dependency graph produced by the builder.
//!
//! Backed by a petgraph `DiGraph` with edges pointing dependency ->
//! dependent, plus a name index and the construction-order node list.
//! After `build` returns, nothing mutates the graph; concurrent readers
//! need no locking.

use super::node::{Node, Param};
use crate::value::ValueType;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A unique, stable identifier for a node within one graph.
pub type NodeId = NodeIndex;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) inner: DiGraph<Node, ()>,
    by_name: HashMap<String, NodeId>,
    /// Node ids in construction order: declared nodes first (in input
    /// order), then synthesized inputs (in first-reference order).
    order: Vec<NodeId>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| &self.inner[id])
    }

    pub(crate) fn node_by_id(&self, id: NodeId) -> &Node {
        &self.inner[id]
    }

    /// All nodes, in construction order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(|&id| &self.inner[id])
    }

    /// All node names, in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes().map(|n| n.name.as_str())
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Declared dependencies of a node, in parameter order.
    pub fn dependencies(&self, name: &str) -> &[Param] {
        self.node(name).map_or(&[], Node::params)
    }

    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        let name = node.name.clone();
        let id = self.inner.add_node(node);
        self.by_name.insert(name, id);
        self.order.push(id);
        id
    }

    pub(crate) fn add_edge(&mut self, dependency: NodeId, dependent: NodeId) {
        self.inner.add_edge(dependency, dependent, ());
    }

    pub(crate) fn retype_node(&mut self, id: NodeId, ty: ValueType) {
        self.inner[id].ty = ty;
    }
}
