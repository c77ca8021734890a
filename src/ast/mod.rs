//! Statement AST subsystem for planlens
//!
//! An explicit tagged tree for parsed SQL statements. Every expression node
//! and from-clause entry carries two pipeline-private attributes as
//! first-class fields: an optional `annotation` and an `expand` flag meaning
//! "this subtree or a descendant was matched; reconstruct it manually
//! instead of delegating to the writer".
//!
//! Parsing SQL text is a collaborator concern and stays outside this crate;
//! trees arrive pre-parsed (the types deserialize from JSON so captured
//! statements can be replayed). [`SqlWriter`] is the formatting side of that
//! collaborator boundary: it deterministically re-serializes any node back
//! to SQL text and serves as the reconstructor's fast path.

mod expr;
mod statement;
mod text;
mod writer;

pub use expr::{ArithOp, CompareOp, ConjOp, DateTimeKind, Expr, ExprKind};
pub use statement::{FromItem, FromSource, OrderItem, SelectItem, Statement};
pub use text::normalize_sql_text;
pub use writer::SqlWriter;
