//! Alternative-plan subsystem for planlens
//!
//! Forces the planner away from its chosen strategies by disabling
//! session-level switches, within a bounded retry loop, and reports either
//! a materially different plan or exhaustion.

mod errors;
mod generator;
mod provider;
mod switches;

pub use errors::{AltPlanError, AltPlanResult, ProviderError};
pub use generator::{generate_alternative, AltPlanConfig, AltPlanOutcome};
pub use provider::{PlanProvider, QueuedPlanProvider};
pub use switches::StrategySwitch;
