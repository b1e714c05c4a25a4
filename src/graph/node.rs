//! Node and declaration records for the dependency graph.
//!
//! A [`Declaration`] is the structured record a declaration source hands
//! to the builder; the engine never inspects code artifacts, only these.
//! A [`Node`] is the built form living inside the graph.

use crate::value::{Value, ValueType};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Boxed failure produced by a compute behavior.
pub type ComputeFailure = Box<dyn std::error::Error + Send + Sync>;

/// A compute behavior: a pure mapping from dependency values to the
/// node's value. Purity is a documented precondition, not enforced.
pub type ComputeFn = Arc<dyn Fn(&Args<'_>) -> Result<Value, ComputeFailure> + Send + Sync>;

/// Dependency values for one compute invocation, keyed by parameter name.
pub struct Args<'a> {
    entries: &'a [(&'a str, &'a Value)],
}

impl<'a> Args<'a> {
    pub(crate) fn new(entries: &'a [(&'a str, &'a Value)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        // Parameter lists are short; a linear scan beats hashing here.
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Like [`Args::get`], but returns a failure suitable for `?` inside
    /// a compute behavior.
    pub fn require(&self, name: &str) -> Result<&'a Value, ComputeFailure> {
        self.get(name)
            .ok_or_else(|| format!("no argument named '{name}'").into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One declared dependency of a computed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self { name: name.into(), ty }
    }

    /// A parameter with no declared type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Any)
    }
}

/// Distinguishes externally supplied leaves from derived values.
#[derive(Clone)]
pub enum NodeKind {
    /// Value supplied by the caller at execution time. No compute
    /// behavior, no dependencies.
    Input,
    /// Value derived from other nodes by a compute behavior.
    Computed {
        compute: ComputeFn,
        params: SmallVec<[Param; 4]>,
    },
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Input => f.write_str("Input"),
            NodeKind::Computed { params, .. } => f
                .debug_struct("Computed")
                .field("params", params)
                .finish_non_exhaustive(),
        }
    }
}

/// One named computation unit in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// The semantic type this node's value must satisfy.
    pub ty: ValueType,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input)
    }

    /// Declared dependencies, in parameter order. Empty for inputs.
    pub fn params(&self) -> &[Param] {
        match &self.kind {
            NodeKind::Input => &[],
            NodeKind::Computed { params, .. } => params,
        }
    }
}

/// One declared computation, as supplied by a declaration source.
#[derive(Clone)]
pub struct Declaration {
    pub name: String,
    pub returns: ValueType,
    pub params: Vec<Param>,
    pub compute: ComputeFn,
}

impl Declaration {
    pub fn new<F>(
        name: impl Into<String>,
        returns: ValueType,
        params: Vec<Param>,
        compute: F,
    ) -> Self
    where
        F: Fn(&Args<'_>) -> Result<Value, ComputeFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            returns,
            params,
            compute: Arc::new(compute),
        }
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("name", &self.name)
            .field("returns", &self.returns)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
