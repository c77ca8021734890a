//! Statement reconstruction subsystem for planlens
//!
//! Re-serializes an annotated statement tree into an ordered sequence of
//! (text, annotation) fragments for side-by-side display. Untouched
//! subtrees take the fast path through [`SqlWriter`](crate::ast::SqlWriter)
//! as a single fragment; subtrees marked `expand` are recursed structurally
//! so each annotation lands on its own fragment.

mod fragment;
mod reconstruct;

pub use fragment::Fragment;
pub use reconstruct::reconstruct;
