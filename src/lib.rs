//! planlens - explains why a query planner chose its plan
//!
//! Takes a captured execution plan and the parsed statement it executed,
//! attaches a human-readable annotation to every statement fragment the plan
//! touches, then forces an alternative plan by disabling planner strategies
//! and explains the difference between the two.

pub mod altplan;
pub mod ast;
pub mod cli;
pub mod compare;
pub mod matcher;
pub mod observability;
pub mod pipeline;
pub mod plan;
pub mod reconstruct;
