//! Coverage accumulator for the annotation pipeline
//!
//! One `CoverageStats` is owned by a single pipeline run and threaded through
//! its stages, never shared between runs. It replaces nothing in the hot
//! path; it only counts how much of the plan the annotations explained.

/// Counters accumulated across one annotation run (reference plan plus any
/// alternative plan it was compared against).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoverageStats {
    plan_nodes: u64,
    operator_events: u64,
    matched_events: u64,
    annotated_nodes: u64,
}

impl CoverageStats {
    /// Creates a fresh accumulator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records plan-tree nodes visited by the normalizer
    pub fn record_plan_nodes(&mut self, count: u64) {
        self.plan_nodes += count;
    }

    /// Records operator events emitted by the normalizer
    pub fn record_events(&mut self, count: u64) {
        self.operator_events += count;
    }

    /// Records operator events that found a statement fragment to annotate
    pub fn record_matched(&mut self, count: u64) {
        self.matched_events += count;
    }

    /// Records statement nodes that ended up carrying an annotation
    pub fn record_annotated(&mut self, count: u64) {
        self.annotated_nodes += count;
    }

    /// Plan-tree nodes visited
    pub fn plan_nodes(&self) -> u64 {
        self.plan_nodes
    }

    /// Operator events emitted
    pub fn operator_events(&self) -> u64 {
        self.operator_events
    }

    /// Operator events that matched a statement fragment
    pub fn matched_events(&self) -> u64 {
        self.matched_events
    }

    /// Statement nodes carrying an annotation
    pub fn annotated_nodes(&self) -> u64 {
        self.annotated_nodes
    }

    /// Fraction of emitted events that matched, in [0, 1]; 0 when no events
    /// were emitted
    pub fn matched_ratio(&self) -> f64 {
        if self.operator_events == 0 {
            0.0
        } else {
            self.matched_events as f64 / self.operator_events as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = CoverageStats::new();
        stats.record_plan_nodes(3);
        stats.record_events(2);
        stats.record_matched(1);
        stats.record_annotated(4);
        stats.record_events(2);

        assert_eq!(stats.plan_nodes(), 3);
        assert_eq!(stats.operator_events(), 4);
        assert_eq!(stats.matched_events(), 1);
        assert_eq!(stats.annotated_nodes(), 4);
    }

    #[test]
    fn test_matched_ratio_zero_without_events() {
        let stats = CoverageStats::new();
        assert_eq!(stats.matched_ratio(), 0.0);
    }

    #[test]
    fn test_matched_ratio() {
        let mut stats = CoverageStats::new();
        stats.record_events(4);
        stats.record_matched(3);
        assert!((stats.matched_ratio() - 0.75).abs() < f64::EPSILON);
    }
}
