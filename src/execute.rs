//! Sequential evaluation of a resolved closure, memoized per call.
//!
//! The [`Store`] is owned and returned by the `execute` call itself, so
//! nothing leaks across requests and independent calls against the same
//! graph need no synchronization. Within a call, each node's compute
//! behavior runs at most once: the resolver lists every name exactly
//! once, in an order where all dependencies come first.

use crate::graph::{Args, ComputeFailure, Graph, NodeKind};
use crate::resolve::ResolutionResult;
use crate::value::Value;
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: ComputeFailure,
    },
    /// An input named by the resolution is absent from the supplied map.
    /// Unreachable after validation; kept typed rather than panicking.
    #[error("required input '{name}' absent from supplied values")]
    MissingInput { name: String },
    /// A dependency was not in the store when its dependent ran. This
    /// breaks the resolver's ordering invariant and indicates a bug.
    #[error("dependency '{dependency}' of node '{node}' missing from store")]
    MissingDependency { node: String, dependency: String },
}

/// Per-call value store mapping node name to computed value.
#[derive(Debug, Clone, Default)]
pub struct Store {
    values: HashMap<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluates the resolved node set in dependency order. On the first
/// compute failure the call aborts and the partial store is discarded.
pub fn execute(
    graph: &Graph,
    resolution: &ResolutionResult,
    supplied: &HashMap<String, Value>,
) -> Result<Store, ExecuteError> {
    let mut store = Store::new();

    for name in &resolution.required_inputs {
        let value = supplied
            .get(name)
            .ok_or_else(|| ExecuteError::MissingInput { name: name.clone() })?;
        store.insert(name.clone(), value.clone());
    }

    for name in &resolution.required_computed {
        let node = graph
            .node(name)
            .expect("BUG: resolved node missing from graph");
        let NodeKind::Computed { compute, params } = &node.kind else {
            continue; // the resolver never lists inputs here
        };

        let mut entries = Vec::with_capacity(params.len());
        for param in params.iter() {
            let value =
                store
                    .get(&param.name)
                    .ok_or_else(|| ExecuteError::MissingDependency {
                        node: name.clone(),
                        dependency: param.name.clone(),
                    })?;
            entries.push((param.name.as_str(), value));
        }

        let args = Args::new(&entries);
        let value = (compute)(&args).map_err(|source| ExecuteError::NodeFailed {
            node: name.clone(),
            source,
        })?;
        store.insert(name.clone(), value);
    }

    debug!("execute finished: {} values in store", store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build, Declaration, Param};
    use crate::resolve::resolve;
    use crate::value::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn int_param(name: &str) -> Param {
        Param::new(name, ValueType::Int)
    }

    #[test]
    fn evaluates_a_chain() {
        // b = a + 1, c = b * 2
        let graph = build(vec![
            Declaration::new("b", ValueType::Int, vec![int_param("a")], |args| {
                Ok(Value::Int(args.require("a")?.as_i64().unwrap_or(0) + 1))
            }),
            Declaration::new("c", ValueType::Int, vec![int_param("b")], |args| {
                Ok(Value::Int(args.require("b")?.as_i64().unwrap_or(0) * 2))
            }),
        ])
        .unwrap();

        let resolution = resolve(&graph, &["c"]).unwrap();
        let supplied = HashMap::from([("a".to_string(), Value::Int(5))]);
        let store = execute(&graph, &resolution, &supplied).unwrap();

        assert_eq!(store.get("a"), Some(&Value::Int(5)));
        assert_eq!(store.get("b"), Some(&Value::Int(6)));
        assert_eq!(store.get("c"), Some(&Value::Int(12)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn shared_dependency_computes_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let graph = build(vec![
            Declaration::new("base", ValueType::Int, vec![int_param("seed")], move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Int(args.require("seed")?.as_i64().unwrap_or(0)))
            }),
            Declaration::new("left", ValueType::Int, vec![int_param("base")], |args| {
                Ok(Value::Int(args.require("base")?.as_i64().unwrap_or(0) + 1))
            }),
            Declaration::new("right", ValueType::Int, vec![int_param("base")], |args| {
                Ok(Value::Int(args.require("base")?.as_i64().unwrap_or(0) + 2))
            }),
            Declaration::new(
                "top",
                ValueType::Int,
                vec![int_param("left"), int_param("right")],
                |args| {
                    let l = args.require("left")?.as_i64().unwrap_or(0);
                    let r = args.require("right")?.as_i64().unwrap_or(0);
                    Ok(Value::Int(l + r))
                },
            ),
        ])
        .unwrap();

        let resolution = resolve(&graph, &["top"]).unwrap();
        let supplied = HashMap::from([("seed".to_string(), Value::Int(10))]);
        let store = execute(&graph, &resolution, &supplied).unwrap();

        assert_eq!(store.get("top"), Some(&Value::Int(23)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A second call recomputes from scratch; nothing is shared.
        execute(&graph, &resolution, &supplied).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compute_failure_aborts_and_names_the_node() {
        let graph = build(vec![
            Declaration::new("bad", ValueType::Int, vec![int_param("a")], |_| {
                Err("boom".into())
            }),
            Declaration::new("after", ValueType::Int, vec![int_param("bad")], |args| {
                Ok(args.require("bad")?.clone())
            }),
        ])
        .unwrap();

        let resolution = resolve(&graph, &["after"]).unwrap();
        let supplied = HashMap::from([("a".to_string(), Value::Int(1))]);
        let err = execute(&graph, &resolution, &supplied).unwrap_err();

        match err {
            ExecuteError::NodeFailed { node, source } => {
                assert_eq!(node, "bad");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected NodeFailed, got {other}"),
        }
    }

    #[test]
    fn missing_supplied_input_is_typed_not_a_panic() {
        let graph = build(vec![Declaration::new(
            "b",
            ValueType::Int,
            vec![int_param("a")],
            |args| Ok(args.require("a")?.clone()),
        )])
        .unwrap();

        let resolution = resolve(&graph, &["b"]).unwrap();
        let err = execute(&graph, &resolution, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ExecuteError::MissingInput { name } if name == "a"));
    }
}
