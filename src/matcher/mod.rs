//! AST matcher subsystem for planlens
//!
//! Consumes operator events one at a time in the normalizer's pre-order and
//! attaches an annotation to the statement fragment each event explains,
//! propagating `expand` from every annotation site to the root of the
//! enclosing expression.
//!
//! # Determinism
//!
//! Annotation sites are idempotent: a node that already carries an
//! annotation is never revisited, so a relation or predicate receives at
//! most one annotation even when several events could textually qualify.

mod errors;
mod matcher;
mod phrase;
mod predicate;

pub use errors::{MatchError, MatchResult};
pub use matcher::{annotate_statement, match_event};
pub use phrase::{annotation_subtype, join_annotation, scan_annotation};
