//! Execution-plan subsystem for planlens
//!
//! Holds the raw plan tree as captured from the database's
//! `EXPLAIN (VERBOSE TRUE, FORMAT JSON)` output and the normalizer that
//! flattens it into an ordered sequence of typed operator events.
//!
//! # Design Principles
//!
//! - Pre-order: a join's event is emitted before its children, children in
//!   `[left, right]` order
//! - Total: unrecognized node types are traversed, never fatal
//! - Strict where it matters: binary-join arity violations abort the run

mod errors;
mod normalize;
mod tree;

pub use errors::{PlanError, PlanResult};
pub use normalize::{normalize, OperatorEvent, OperatorKind, OperatorSubtype};
pub use tree::{parse_explain_json, PlanNode};
