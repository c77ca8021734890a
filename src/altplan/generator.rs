//! Alternative-plan search
//!
//! Bounded retry loop: disable at most one scan and one join strategy drawn
//! from the reference plan's operators, request a fresh plan, and accept it
//! if it is materially different. Each rejection widens the disabled set by
//! the next strategy seen so far, until nothing is left to disable or the
//! attempt budget runs out.

use std::collections::BTreeSet;

use crate::compare::plans_equivalent;
use crate::observability::Logger;
use crate::plan::{normalize, OperatorEvent, OperatorSubtype, PlanNode};

use super::errors::AltPlanResult;
use super::provider::PlanProvider;
use super::switches::StrategySwitch;

/// Search order and attempt budget for the generator.
#[derive(Debug, Clone)]
pub struct AltPlanConfig {
    /// Scan strategies to disable, most preferred first
    pub scan_priority: Vec<OperatorSubtype>,
    /// Join strategies to disable, most preferred first
    pub join_priority: Vec<OperatorSubtype>,
    /// Maximum plan requests before giving up
    pub max_attempts: usize,
}

impl Default for AltPlanConfig {
    fn default() -> Self {
        Self {
            scan_priority: vec![
                OperatorSubtype::IndexScan,
                OperatorSubtype::IndexOnlyScan,
                OperatorSubtype::BitmapHeapScan,
                OperatorSubtype::BitmapIndexScan,
                OperatorSubtype::SeqScan,
            ],
            join_priority: vec![
                OperatorSubtype::HashJoin,
                OperatorSubtype::MergeJoin,
                OperatorSubtype::NestedLoop,
            ],
            max_attempts: 3,
        }
    }
}

/// Terminal state of the search.
#[derive(Debug)]
pub enum AltPlanOutcome {
    /// A materially different plan was found
    Alternative(PlanNode),
    /// Every disable option was tried, or the attempt budget ran out,
    /// without producing a different plan
    Exhausted,
}

/// Searches for a plan materially different from the reference plan.
pub fn generate_alternative(
    provider: &mut dyn PlanProvider,
    sql: &str,
    reference_events: &[OperatorEvent],
    config: &AltPlanConfig,
) -> AltPlanResult<AltPlanOutcome> {
    let reference_subtypes: Vec<OperatorSubtype> =
        reference_events.iter().map(|e| e.subtype).collect();
    // a rejected candidate is set-equivalent to the reference, so the
    // reference subtypes are the whole widening universe
    let seen: BTreeSet<OperatorSubtype> = reference_subtypes.iter().copied().collect();

    // at most one scan and one join switch to start with
    let mut disabled: Vec<StrategySwitch> = Vec::new();
    let scan_switch = pick(&config.scan_priority, &seen, &disabled);
    disabled.extend(scan_switch);
    let join_switch = pick(&config.join_priority, &seen, &disabled);
    disabled.extend(join_switch);
    if disabled.is_empty() {
        return Ok(AltPlanOutcome::Exhausted);
    }

    for attempt in 1..=config.max_attempts {
        Logger::debug(
            "ALT_PLAN_ATTEMPT",
            &[
                ("attempt", attempt.to_string().as_str()),
                ("disabled", settings_list(&disabled).as_str()),
            ],
        );

        let candidate = provider.explain_with(sql, &disabled)?;
        let candidate_subtypes: Vec<OperatorSubtype> = normalize(&candidate)?
            .iter()
            .map(|e| e.subtype)
            .collect();

        if !plans_equivalent(&reference_subtypes, &candidate_subtypes) {
            Logger::info(
                "ALT_PLAN_ACCEPTED",
                &[("attempt", attempt.to_string().as_str())],
            );
            return Ok(AltPlanOutcome::Alternative(candidate));
        }

        let next = pick(&config.scan_priority, &seen, &disabled)
            .or_else(|| pick(&config.join_priority, &seen, &disabled));
        match next {
            Some(switch) => disabled.push(switch),
            None => {
                Logger::info(
                    "ALT_PLAN_EXHAUSTED",
                    &[("reason", "all strategies disabled")],
                );
                return Ok(AltPlanOutcome::Exhausted);
            }
        }
    }

    Logger::info("ALT_PLAN_EXHAUSTED", &[("reason", "attempt budget spent")]);
    Ok(AltPlanOutcome::Exhausted)
}

// Highest-priority switch for an operator seen in a plan and not yet
// disabled.
fn pick(
    priority: &[OperatorSubtype],
    seen: &BTreeSet<OperatorSubtype>,
    disabled: &[StrategySwitch],
) -> Option<StrategySwitch> {
    priority
        .iter()
        .copied()
        .filter(|subtype| seen.contains(subtype))
        .map(StrategySwitch::for_subtype)
        .find(|switch| !disabled.contains(switch))
}

fn settings_list(disabled: &[StrategySwitch]) -> String {
    disabled
        .iter()
        .map(|s| s.setting())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::altplan::provider::QueuedPlanProvider;
    use serde_json::json;

    fn node(value: serde_json::Value) -> PlanNode {
        serde_json::from_value(value).unwrap()
    }

    fn seq_scan(rel: &str) -> serde_json::Value {
        json!({
            "Node Type": "Seq Scan",
            "Total Cost": 11.7,
            "Relation Name": rel,
            "Alias": rel
        })
    }

    fn index_scan(rel: &str) -> serde_json::Value {
        json!({
            "Node Type": "Index Scan",
            "Total Cost": 4.3,
            "Relation Name": rel,
            "Alias": rel,
            "Index Name": format!("{rel}_pkey")
        })
    }

    fn events_of(plan: &PlanNode) -> Vec<OperatorEvent> {
        normalize(plan).unwrap()
    }

    #[test]
    fn test_single_seq_scan_exhausts_within_budget() {
        // nothing but a sequential scan and no queued alternative: the
        // planner keeps answering with the same plan
        let reference = node(seq_scan("nation"));
        let events = events_of(&reference);
        let mut provider = QueuedPlanProvider::new(reference);

        let outcome = generate_alternative(
            &mut provider,
            "select * from nation",
            &events,
            &AltPlanConfig::default(),
        )
        .unwrap();
        assert!(matches!(outcome, AltPlanOutcome::Exhausted));
    }

    #[test]
    fn test_different_plan_is_accepted() {
        let reference = node(seq_scan("nation"));
        let events = events_of(&reference);
        let mut provider = QueuedPlanProvider::new(reference);
        provider.push_alternative(node(index_scan("nation")));

        let outcome = generate_alternative(
            &mut provider,
            "select * from nation",
            &events,
            &AltPlanConfig::default(),
        )
        .unwrap();
        let AltPlanOutcome::Alternative(plan) = outcome else {
            panic!("expected an alternative plan");
        };
        assert_eq!(plan.node_type, "Index Scan");
    }

    #[test]
    fn test_attempt_budget_bounds_the_search() {
        // a join plan offers several strategies to disable, but every
        // constrained answer is identical to the reference
        let reference = node(json!({
            "Node Type": "Hash Join",
            "Total Cost": 50.0,
            "Hash Cond": "(a.x = b.y)",
            "Plans": [seq_scan("a"), index_scan("b")]
        }));
        let events = events_of(&reference);
        let mut provider = QueuedPlanProvider::new(reference.clone());
        for _ in 0..5 {
            provider.push_alternative(reference.clone());
        }

        let config = AltPlanConfig {
            max_attempts: 2,
            ..AltPlanConfig::default()
        };
        let outcome =
            generate_alternative(&mut provider, "q", &events, &config).unwrap();
        assert!(matches!(outcome, AltPlanOutcome::Exhausted));
    }

    #[test]
    fn test_second_attempt_widens_the_disabled_set() {
        // two scan subtypes: the initial pick disables the index scan and
        // the hash join, the first constrained answer is unchanged, so the
        // retry disables the remaining seq scan before the differing plan
        // is dequeued
        let reference = node(json!({
            "Node Type": "Hash Join",
            "Total Cost": 50.0,
            "Hash Cond": "(a.x = b.y)",
            "Plans": [index_scan("a"), seq_scan("b")]
        }));
        let events = events_of(&reference);
        let mut provider = QueuedPlanProvider::new(reference.clone());
        provider.push_alternative(reference.clone());
        provider.push_alternative(node(json!({
            "Node Type": "Nested Loop",
            "Total Cost": 80.0,
            "Join Filter": "(a.x = b.y)",
            "Plans": [seq_scan("a"), seq_scan("b")]
        })));

        let outcome = generate_alternative(
            &mut provider,
            "q",
            &events,
            &AltPlanConfig::default(),
        )
        .unwrap();
        assert!(matches!(outcome, AltPlanOutcome::Alternative(_)));
    }

    #[test]
    fn test_single_subtype_reference_exhausts_despite_queued_plans() {
        // with only the index scan seen, nothing is left to disable after
        // the first identical answer; the queued plans are never reached
        let reference = node(index_scan("nation"));
        let events = events_of(&reference);
        let mut provider = QueuedPlanProvider::new(reference.clone());
        provider.push_alternative(reference.clone());
        provider.push_alternative(node(seq_scan("nation")));

        let outcome = generate_alternative(
            &mut provider,
            "q",
            &events,
            &AltPlanConfig::default(),
        )
        .unwrap();
        assert!(matches!(outcome, AltPlanOutcome::Exhausted));
    }
}
