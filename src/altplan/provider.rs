//! Plan provider seam
//!
//! The generator talks to the planning database through this trait. Every
//! request passes the full set of switches to disable, so a retried attempt
//! never inherits leftover session state from a previous one.

use std::collections::VecDeque;

use crate::plan::PlanNode;

use super::errors::ProviderError;
use super::switches::StrategySwitch;

/// Source of execution plans for a statement.
pub trait PlanProvider {
    /// Plan with default planner settings.
    fn explain(&mut self, sql: &str) -> Result<PlanNode, ProviderError> {
        self.explain_with(sql, &[])
    }

    /// Plan with the given strategies disabled for this request only.
    fn explain_with(
        &mut self,
        sql: &str,
        disabled: &[StrategySwitch],
    ) -> Result<PlanNode, ProviderError>;
}

/// Provider backed by pre-captured plans: one reference plan plus a queue of
/// alternatives handed out for requests that disable anything. When the
/// queue runs dry the reference plan is returned again, which is how a
/// planner with no other option behaves.
pub struct QueuedPlanProvider {
    reference: PlanNode,
    alternatives: VecDeque<PlanNode>,
}

impl QueuedPlanProvider {
    pub fn new(reference: PlanNode) -> Self {
        Self {
            reference,
            alternatives: VecDeque::new(),
        }
    }

    /// Queues a plan to return for the next constrained request.
    pub fn push_alternative(&mut self, plan: PlanNode) {
        self.alternatives.push_back(plan);
    }
}

impl PlanProvider for QueuedPlanProvider {
    fn explain_with(
        &mut self,
        _sql: &str,
        disabled: &[StrategySwitch],
    ) -> Result<PlanNode, ProviderError> {
        if disabled.is_empty() {
            return Ok(self.reference.clone());
        }
        Ok(self
            .alternatives
            .pop_front()
            .unwrap_or_else(|| self.reference.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(rel: &str) -> PlanNode {
        serde_json::from_value(json!({
            "Node Type": "Seq Scan",
            "Total Cost": 1.0,
            "Relation Name": rel,
            "Alias": rel
        }))
        .unwrap()
    }

    #[test]
    fn test_unconstrained_request_returns_reference() {
        let mut provider = QueuedPlanProvider::new(plan("nation"));
        provider.push_alternative(plan("region"));

        let got = provider.explain("select * from nation").unwrap();
        assert_eq!(got.relation_name.as_deref(), Some("nation"));
    }

    #[test]
    fn test_constrained_requests_drain_queue_then_repeat_reference() {
        let mut provider = QueuedPlanProvider::new(plan("nation"));
        provider.push_alternative(plan("region"));
        let disabled = [StrategySwitch::SeqScan];

        let first = provider.explain_with("q", &disabled).unwrap();
        assert_eq!(first.relation_name.as_deref(), Some("region"));
        let second = provider.explain_with("q", &disabled).unwrap();
        assert_eq!(second.relation_name.as_deref(), Some("nation"));
    }
}
