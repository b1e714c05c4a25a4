//! The dependency graph: declaration records, the builder, and the
//! immutable DAG it produces.

pub mod builder;
pub mod dag;
pub mod node;

pub use builder::{build, BuildError};
pub use dag::{Graph, NodeId};
pub use node::{Args, ComputeFailure, ComputeFn, Declaration, Node, NodeKind, Param};
