//! Observability subsystem for planlens
//!
//! Provides:
//! - Structured diagnostic logging (JSON, one line per event)
//! - A per-run coverage accumulator for the annotation pipeline
//!
//! # Principles
//!
//! 1. Diagnostics are read-only; they never change the success path
//! 2. Synchronous output, no buffering, no background threads
//! 3. Deterministic field ordering

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::CoverageStats;
