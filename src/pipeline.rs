//! End-to-end annotation pipeline
//!
//! Runs normalizer, matcher, and reconstructor over one plan, and drives the
//! alternative-plan search plus comparator for the two-plan flow. Each run
//! operates on its own statement copy and its own coverage accumulator.

use thiserror::Error;

use crate::altplan::{
    generate_alternative, AltPlanConfig, AltPlanError, AltPlanOutcome, PlanProvider,
    ProviderError,
};
use crate::ast::Statement;
use crate::compare::{fallback_rationales, fragment_rationales};
use crate::matcher::{annotate_statement, MatchError};
use crate::observability::{CoverageStats, Logger};
use crate::plan::{normalize, OperatorSubtype, PlanError, PlanNode};
use crate::reconstruct::{reconstruct, Fragment};

/// Fatal pipeline failure; there is no partial output when one occurs.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    AltPlan(#[from] AltPlanError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// One plan's annotated rendition of the statement.
#[derive(Debug)]
pub struct AnnotatedQuery {
    /// Ordered statement fragments with their annotations
    pub fragments: Vec<Fragment>,
    /// The plan's operator subtypes in normalizer order
    pub operators: Vec<OperatorSubtype>,
}

/// Reference plan annotation paired with the alternative plan's, if one was
/// found, and the per-fragment rationales.
#[derive(Debug)]
pub struct PlanComparison {
    pub reference: AnnotatedQuery,
    /// `None` when the generator exhausted every strategy switch
    pub alternative: Option<AnnotatedQuery>,
    /// One slot per reference fragment
    pub rationales: Vec<Option<String>>,
}

/// Annotates one statement copy against one plan.
pub fn annotate_query(
    mut statement: Statement,
    plan: &PlanNode,
    stats: &mut CoverageStats,
) -> Result<AnnotatedQuery, AnnotateError> {
    stats.record_plan_nodes(plan.node_count() as u64);
    let events = normalize(plan)?;
    stats.record_events(events.len() as u64);

    let matched = annotate_statement(&mut statement, &events)?;
    stats.record_matched(matched as u64);
    stats.record_annotated(statement.annotation_count() as u64);

    Ok(AnnotatedQuery {
        fragments: reconstruct(&statement),
        operators: events.iter().map(|e| e.subtype).collect(),
    })
}

/// Full two-plan flow: annotate the reference plan, search for an
/// alternative, annotate it too, and compute rationales. Falls back to
/// per-join rationale sentences when no alternative exists.
pub fn explain_with_alternative(
    provider: &mut dyn PlanProvider,
    sql: &str,
    statement: &Statement,
    config: &AltPlanConfig,
) -> Result<(PlanComparison, CoverageStats), AnnotateError> {
    let mut stats = CoverageStats::new();

    let reference_plan = provider.explain(sql)?;
    let reference_events = normalize(&reference_plan)?;
    let reference = annotate_query(statement.clone(), &reference_plan, &mut stats)?;

    let comparison = match generate_alternative(provider, sql, &reference_events, config)? {
        AltPlanOutcome::Alternative(plan) => {
            let alternative = annotate_query(statement.clone(), &plan, &mut stats)?;
            let rationales = fragment_rationales(&reference.fragments, &alternative.fragments);
            PlanComparison {
                reference,
                alternative: Some(alternative),
                rationales,
            }
        }
        AltPlanOutcome::Exhausted => {
            let rationales = fallback_rationales(&reference.fragments);
            PlanComparison {
                reference,
                alternative: None,
                rationales,
            }
        }
    };

    Logger::info(
        "PIPELINE_COMPLETE",
        &[
            ("matched_events", stats.matched_events().to_string().as_str()),
            (
                "operator_events",
                stats.operator_events().to_string().as_str(),
            ),
        ],
    );
    Ok((comparison, stats))
}
