//! Runtime values and the declared-type tags they are checked against.
//!
//! Dynamic typing is done with an explicit tag per value rather than any
//! form of reflection: every node declares a [`ValueType`], every runtime
//! [`Value`] reports one, and compatibility is a fixed rule table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The semantic type a node's value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Int,
    Float,
    Bool,
    Text,
    /// A row-aligned sequence of floats.
    Series,
    /// No constraint; accepts every runtime value. Used for parameters
    /// declared without a type.
    Any,
}

impl ValueType {
    /// Compatibility check used by the graph builder and the input
    /// validator: exact match, `Any` on either side, plus the widening
    /// rule that an `Int` value satisfies a declared `Float`.
    pub fn accepts(self, actual: ValueType) -> bool {
        match (self, actual) {
            (ValueType::Any, _) | (_, ValueType::Any) => true,
            (ValueType::Float, ValueType::Int) => true,
            (a, b) => a == b,
        }
    }

    /// Reconciles two declared references to the same node. Returns the
    /// more specific of the two, or `None` when they conflict.
    pub fn unify(self, other: ValueType) -> Option<ValueType> {
        match (self, other) {
            (ValueType::Any, t) | (t, ValueType::Any) => Some(t),
            (a, b) if a == b => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Text => "text",
            ValueType::Series => "series",
            ValueType::Any => "any",
        };
        f.write_str(s)
    }
}

/// The atomic unit of data flowing through the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Shared reference to a sequence, so fan-out costs one refcount
    /// bump instead of a copy.
    Series(Arc<Vec<f64>>),
}

impl Value {
    pub fn series(values: Vec<f64>) -> Self {
        Value::Series(Arc::new(values))
    }

    /// The runtime tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::Text(_) => ValueType::Text,
            Value::Series(_) => ValueType::Series,
        }
    }

    /// Row count: the length for a series, 1 for every scalar.
    pub fn len(&self) -> usize {
        match self {
            Value::Series(s) => s.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; widens `Int` to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Value::Series(v) => Some(v),
            _ => None,
        }
    }
}
