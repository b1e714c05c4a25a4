//! Checks caller-supplied inputs against the leaves a request needs.
//!
//! Runs to completion and reports every violation in one pass, so a
//! caller can fix a whole input map in a single round trip. No side
//! effects; nothing here touches the execution store.

use crate::graph::Graph;
use crate::value::{Value, ValueType};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("required input '{name}' not provided")]
    Missing { name: String },
    #[error("input '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },
}

pub fn validate(
    graph: &Graph,
    required_inputs: &[String],
    supplied: &HashMap<String, Value>,
) -> Result<(), Vec<InputError>> {
    let mut errors = Vec::new();

    for name in required_inputs {
        let node = graph
            .node(name)
            .expect("BUG: resolved input missing from graph");
        match supplied.get(name) {
            None => errors.push(InputError::Missing { name: name.clone() }),
            Some(value) => {
                let actual = value.value_type();
                if !node.ty.accepts(actual) {
                    errors.push(InputError::TypeMismatch {
                        name: name.clone(),
                        expected: node.ty,
                        actual,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
