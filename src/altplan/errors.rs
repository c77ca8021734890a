//! Alternative-plan generation errors

use thiserror::Error;

use crate::plan::PlanError;

/// Failure surfaced by a plan provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("plan provider has no plan for statement: {0}")]
    NoPlan(String),

    #[error("plan provider backend failed: {0}")]
    Backend(String),
}

/// Failure while generating an alternative plan.
#[derive(Debug, Error)]
pub enum AltPlanError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub type AltPlanResult<T> = Result<T, AltPlanError>;
