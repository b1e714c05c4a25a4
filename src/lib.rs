//! A minimal-closure dataflow driver.
//!
//! A library of named computations is declared once; each request names
//! the outputs it wants, and the engine resolves, validates, and executes
//! only the subgraph needed to produce them, feeding caller-supplied
//! values in as leaves. There is no caching across requests: every
//! `execute` call owns its own store and recomputes from scratch, which
//! is what makes concurrent requests against one graph safe without
//! locking.
//!
//! ```
//! use rivulet::{build, Declaration, Driver, Param, Value, ValueType};
//! use std::collections::HashMap;
//!
//! let graph = build(vec![
//!     Declaration::new(
//!         "b",
//!         ValueType::Int,
//!         vec![Param::new("a", ValueType::Int)],
//!         |args| Ok(Value::Int(args.require("a")?.as_i64().unwrap_or(0) + 1)),
//!     ),
//!     Declaration::new(
//!         "c",
//!         ValueType::Int,
//!         vec![Param::new("b", ValueType::Int)],
//!         |args| Ok(Value::Int(args.require("b")?.as_i64().unwrap_or(0) * 2)),
//!     ),
//! ])
//! .unwrap();
//!
//! let driver = Driver::new(graph);
//! let inputs = HashMap::from([("a".to_string(), Value::Int(5))]);
//! let result = driver.execute(&["c"], &inputs).unwrap();
//! assert_eq!(result.get("c"), Some(&Value::Int(12)));
//! ```

pub mod display;
pub mod driver;
pub mod execute;
pub mod graph;
pub mod resolve;
pub mod validate;
pub mod value;

pub use display::{DotRenderer, GraphRenderer};
pub use driver::{Driver, DriverError, ResultSet};
pub use execute::{execute, ExecuteError, Store};
pub use graph::{
    build, Args, BuildError, ComputeFailure, ComputeFn, Declaration, Graph, Node, NodeKind, Param,
};
pub use resolve::{resolve, ResolutionResult, ResolveError};
pub use validate::{validate, InputError};
pub use value::{Value, ValueType};
