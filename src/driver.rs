//! The request façade: resolve, validate, execute, project.
//!
//! One [`Driver`] owns one built graph for the lifetime of a session and
//! serves any number of requests against it, each fully independent.

use crate::display::GraphRenderer;
use crate::execute::{self, ExecuteError};
use crate::graph::Graph;
use crate::resolve::{self, ResolutionResult, ResolveError};
use crate::validate::{self, InputError};
use crate::value::Value;
use log::warn;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid inputs: [{}]", join_errors(.0))]
    Invalid(Vec<InputError>),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

fn join_errors(errors: &[InputError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The projection of one execution, restricted to the requested names in
/// request order. This is the boundary type a result packager consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<(String, Value)>,
}

impl ResultSet {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when every sequence-valued column has the same row count.
    /// The engine does not enforce this; alignment policy belongs to the
    /// packager, this is a convenience check only.
    pub fn row_aligned(&self) -> bool {
        let mut rows = None;
        for (_, value) in &self.columns {
            if value.as_series().is_some() {
                match rows {
                    None => rows = Some(value.len()),
                    Some(expected) if expected != value.len() => return false,
                    Some(_) => {}
                }
            }
        }
        true
    }
}

pub struct Driver {
    graph: Graph,
}

impl Driver {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// All node names, in construction order.
    pub fn list_variables(&self) -> Vec<String> {
        self.graph.names().map(String::from).collect()
    }

    /// Exposes the closure resolver for introspection without executing.
    pub fn resolve(&self, final_vars: &[&str]) -> Result<ResolutionResult, ResolveError> {
        resolve::resolve(&self.graph, final_vars)
    }

    /// Runs the full pipeline for one request and projects only the
    /// requested names out of the store.
    pub fn execute(
        &self,
        final_vars: &[&str],
        inputs: &HashMap<String, Value>,
    ) -> Result<ResultSet, DriverError> {
        let resolution = resolve::resolve(&self.graph, final_vars)?;
        validate::validate(&self.graph, &resolution.required_inputs, inputs)
            .map_err(DriverError::Invalid)?;
        let store = execute::execute(&self.graph, &resolution, inputs)?;

        let mut columns = Vec::with_capacity(final_vars.len());
        for &name in final_vars {
            let value = store
                .get(name)
                .expect("BUG: requested node absent after execution")
                .clone();
            columns.push((name.to_string(), value));
        }
        Ok(ResultSet { columns })
    }

    /// Renders the graph through the given collaborator. Best-effort: a
    /// failure is logged and swallowed, never surfaced to the caller.
    pub fn render(&self, renderer: &dyn GraphRenderer, dest: &str) {
        if let Err(err) = renderer.render(&self.graph, dest) {
            warn!("graph render to '{dest}' failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DotRenderer;
    use crate::graph::{build, Declaration, Param};
    use crate::value::ValueType;

    /// The canonical scenario: a (input int), b = a + 1, c = b * 2.
    fn arithmetic_driver() -> Driver {
        let graph = build(vec![
            Declaration::new(
                "b",
                ValueType::Int,
                vec![Param::new("a", ValueType::Int)],
                |args| Ok(Value::Int(args.require("a")?.as_i64().unwrap_or(0) + 1)),
            ),
            Declaration::new(
                "c",
                ValueType::Int,
                vec![Param::new("b", ValueType::Int)],
                |args| Ok(Value::Int(args.require("b")?.as_i64().unwrap_or(0) * 2)),
            ),
        ])
        .unwrap();
        Driver::new(graph)
    }

    fn inputs(v: i64) -> HashMap<String, Value> {
        HashMap::from([("a".to_string(), Value::Int(v))])
    }

    #[test]
    fn projects_only_the_requested_names() {
        let _ = env_logger::builder().is_test(true).try_init();
        let driver = arithmetic_driver();

        let result = driver.execute(&["c"], &inputs(5)).unwrap();
        assert_eq!(result.get("c"), Some(&Value::Int(12)));
        assert_eq!(result.len(), 1);
        assert!(result.get("b").is_none());
    }

    #[test]
    fn an_input_can_be_requested_alongside_computed_nodes() {
        let driver = arithmetic_driver();
        let result = driver.execute(&["a", "c"], &inputs(5)).unwrap();
        let names: Vec<&str> = result.names().collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(result.get("a"), Some(&Value::Int(5)));
        assert_eq!(result.get("c"), Some(&Value::Int(12)));
    }

    #[test]
    fn unknown_output_is_rejected_before_validation() {
        let driver = arithmetic_driver();
        let err = driver.execute(&["d"], &inputs(5)).unwrap_err();
        assert!(
            matches!(err, DriverError::Resolve(ResolveError::UnknownNode { ref name }) if name == "d")
        );
    }

    #[test]
    fn mistyped_input_is_rejected_before_execution() {
        let driver = arithmetic_driver();
        let supplied = HashMap::from([("a".to_string(), Value::Text("five".into()))]);
        match driver.execute(&["c"], &supplied).unwrap_err() {
            DriverError::Invalid(errors) => {
                assert_eq!(
                    errors,
                    vec![InputError::TypeMismatch {
                        name: "a".into(),
                        expected: ValueType::Int,
                        actual: ValueType::Text,
                    }]
                );
            }
            other => panic!("expected Invalid, got {other}"),
        }
    }

    #[test]
    fn lists_variables_in_construction_order() {
        let driver = arithmetic_driver();
        assert_eq!(driver.list_variables(), ["b", "c", "a"]);
    }

    #[test]
    fn render_is_best_effort() {
        let driver = arithmetic_driver();
        // A destination that cannot be created must not fail the driver.
        driver.render(&DotRenderer, "/nonexistent-dir/graph.dot");
    }

    #[test]
    fn row_alignment_check() {
        let graph = build(vec![
            Declaration::new(
                "doubled",
                ValueType::Series,
                vec![Param::new("xs", ValueType::Series)],
                |args| {
                    let xs = args.require("xs")?.as_series().unwrap_or(&[]).to_vec();
                    Ok(Value::series(xs.iter().map(|x| x * 2.0).collect()))
                },
            ),
            Declaration::new(
                "truncated",
                ValueType::Series,
                vec![Param::new("xs", ValueType::Series)],
                |args| {
                    let xs = args.require("xs")?.as_series().unwrap_or(&[]);
                    Ok(Value::series(xs.iter().take(1).copied().collect()))
                },
            ),
        ])
        .unwrap();
        let driver = Driver::new(graph);
        let supplied = HashMap::from([("xs".to_string(), Value::series(vec![1.0, 2.0]))]);

        let aligned = driver.execute(&["xs", "doubled"], &supplied).unwrap();
        assert!(aligned.row_aligned());

        let ragged = driver.execute(&["doubled", "truncated"], &supplied).unwrap();
        assert!(!ragged.row_aligned());
    }

    #[test]
    fn concurrent_requests_share_the_graph_without_locking() {
        let driver = arithmetic_driver();
        std::thread::scope(|scope| {
            for v in 0..4 {
                let driver = &driver;
                scope.spawn(move || {
                    let result = driver.execute(&["c"], &inputs(v)).unwrap();
                    assert_eq!(result.get("c"), Some(&Value::Int((v + 1) * 2)));
                });
            }
        });
    }
}
