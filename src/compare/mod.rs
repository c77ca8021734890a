//! Plan comparison subsystem for planlens
//!
//! Decides whether a forced alternative plan is materially different from
//! the reference plan, and produces per-fragment rationale sentences from a
//! static explanation table.

mod comparator;
mod table;

pub use comparator::{fallback_rationales, fragment_rationales, plans_equivalent};
pub use table::ExplanationTable;
