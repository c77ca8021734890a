//! Plan normalization: raw plan tree to ordered operator events
//!
//! Flattens the plan in pre-order into `OperatorEvent`s, one per join or
//! scan. Housekeeping operators (Sort, Aggregate, Hash, Gather, ...) emit
//! nothing and are traversed transparently, so the event count always equals
//! the number of join/scan nodes in the tree.

use crate::observability::Logger;

use super::errors::{PlanError, PlanResult};
use super::tree::PlanNode;

/// Coarse operator class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Join,
    Scan,
}

/// The operator subtypes the annotation engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorSubtype {
    NestedLoop,
    HashJoin,
    MergeJoin,
    SeqScan,
    IndexScan,
    IndexOnlyScan,
    BitmapIndexScan,
    BitmapHeapScan,
}

impl OperatorSubtype {
    /// All subtypes, joins first
    pub const ALL: [OperatorSubtype; 8] = [
        OperatorSubtype::NestedLoop,
        OperatorSubtype::HashJoin,
        OperatorSubtype::MergeJoin,
        OperatorSubtype::SeqScan,
        OperatorSubtype::IndexScan,
        OperatorSubtype::IndexOnlyScan,
        OperatorSubtype::BitmapIndexScan,
        OperatorSubtype::BitmapHeapScan,
    ];

    /// The operator class this subtype belongs to
    pub fn kind(&self) -> OperatorKind {
        match self {
            OperatorSubtype::NestedLoop
            | OperatorSubtype::HashJoin
            | OperatorSubtype::MergeJoin => OperatorKind::Join,
            _ => OperatorKind::Scan,
        }
    }

    /// Returns true for the join subtypes
    pub fn is_join(&self) -> bool {
        self.kind() == OperatorKind::Join
    }

    /// Display name used inside annotation sentences
    pub fn display(&self) -> &'static str {
        match self {
            OperatorSubtype::NestedLoop => "Nested loop",
            OperatorSubtype::HashJoin => "Hash join",
            OperatorSubtype::MergeJoin => "Merge join",
            OperatorSubtype::SeqScan => "Sequence scan",
            OperatorSubtype::IndexScan => "Index scan",
            OperatorSubtype::IndexOnlyScan => "Index only scan",
            OperatorSubtype::BitmapIndexScan => "Bitmap index scan",
            OperatorSubtype::BitmapHeapScan => "Bitmap heap scan",
        }
    }

    /// Inverse of [`display`](Self::display): recognizes a display name at
    /// the start of `text`. Longer names are tried first so "Index only
    /// scan" is never mistaken for "Index scan".
    pub fn from_display_prefix(text: &str) -> Option<OperatorSubtype> {
        let mut candidates = Self::ALL;
        candidates.sort_by_key(|s| std::cmp::Reverse(s.display().len()));
        candidates
            .into_iter()
            .find(|s| text.starts_with(s.display()))
    }
}

/// The normalized unit emitted by the normalizer: one join or scan,
/// immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorEvent {
    /// Join or Scan
    pub kind: OperatorKind,
    /// Specific operator
    pub subtype: OperatorSubtype,
    /// Raw predicate text from the plan; empty when the join condition is
    /// implicit
    pub filter: String,
    /// Scanned relation; empty for joins
    pub relation: String,
    /// Statement alias of the scanned relation; empty for joins
    pub alias: String,
    /// Backing index for index-family scans
    pub index: Option<String>,
    /// Planner's estimated total cost
    pub cost: f64,
    /// Left child's projected columns; only set for joins lacking an
    /// explicit filter
    pub lhs_output: Vec<String>,
    /// Right child's projected columns; only set for joins lacking an
    /// explicit filter
    pub rhs_output: Vec<String>,
}

impl OperatorEvent {
    /// Creates a join event
    pub fn join(subtype: OperatorSubtype, filter: impl Into<String>, cost: f64) -> Self {
        Self {
            kind: OperatorKind::Join,
            subtype,
            filter: filter.into(),
            relation: String::new(),
            alias: String::new(),
            index: None,
            cost,
            lhs_output: Vec::new(),
            rhs_output: Vec::new(),
        }
    }

    /// Creates a scan event
    pub fn scan(
        subtype: OperatorSubtype,
        relation: impl Into<String>,
        alias: impl Into<String>,
        filter: impl Into<String>,
        index: Option<String>,
        cost: f64,
    ) -> Self {
        Self {
            kind: OperatorKind::Scan,
            subtype,
            filter: filter.into(),
            relation: relation.into(),
            alias: alias.into(),
            index,
            cost,
            lhs_output: Vec::new(),
            rhs_output: Vec::new(),
        }
    }

    /// Copy of this event with the filter text replaced; used when testing
    /// implicit join-key candidates
    pub fn with_filter(&self, filter: impl Into<String>) -> Self {
        let mut event = self.clone();
        event.filter = filter.into();
        event
    }
}

/// Flattens a plan tree into operator events in pre-order.
pub fn normalize(plan: &PlanNode) -> PlanResult<Vec<OperatorEvent>> {
    let mut events = Vec::new();
    walk(plan, &mut events)?;
    Ok(events)
}

fn walk(node: &PlanNode, out: &mut Vec<OperatorEvent>) -> PlanResult<()> {
    match node.node_type.as_str() {
        "Nested Loop" => {
            require_binary(node)?;
            if let Some(filter) = &node.join_filter {
                out.push(OperatorEvent::join(
                    OperatorSubtype::NestedLoop,
                    filter.clone(),
                    node.total_cost,
                ));
            } else {
                // No explicit condition: carry both children's projections
                // so the matcher can infer the join key
                let mut event =
                    OperatorEvent::join(OperatorSubtype::NestedLoop, "", node.total_cost);
                event.lhs_output = node.children[0].output.clone();
                event.rhs_output = node.children[1].output.clone();
                out.push(event);
            }
            walk(&node.children[0], out)?;
            walk(&node.children[1], out)
        }
        "Hash Join" => {
            require_binary(node)?;
            let cond = node
                .hash_cond
                .as_ref()
                .ok_or_else(|| PlanError::missing(&node.node_type, "Hash Cond"))?;
            out.push(OperatorEvent::join(
                OperatorSubtype::HashJoin,
                cond.clone(),
                node.total_cost,
            ));
            walk(&node.children[0], out)?;
            walk(&node.children[1], out)
        }
        "Merge Join" => {
            let cond = node
                .merge_cond
                .as_ref()
                .ok_or_else(|| PlanError::missing(&node.node_type, "Merge Cond"))?;
            out.push(OperatorEvent::join(
                OperatorSubtype::MergeJoin,
                cond.clone(),
                node.total_cost,
            ));
            walk_children(node, out)
        }
        "Seq Scan" => {
            out.push(OperatorEvent::scan(
                OperatorSubtype::SeqScan,
                required(node, node.relation_name.as_deref(), "Relation Name")?,
                required(node, node.alias.as_deref(), "Alias")?,
                node.filter.clone().unwrap_or_default(),
                None,
                node.total_cost,
            ));
            Ok(())
        }
        "Index Scan" | "Index Only Scan" => {
            let subtype = if node.node_type == "Index Scan" {
                OperatorSubtype::IndexScan
            } else {
                OperatorSubtype::IndexOnlyScan
            };
            // Index condition first, residual filter second
            let filter = [node.index_cond.as_deref(), node.filter.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" AND ");
            out.push(OperatorEvent::scan(
                subtype,
                required(node, node.relation_name.as_deref(), "Relation Name")?,
                required(node, node.alias.as_deref(), "Alias")?,
                filter,
                Some(required(node, node.index_name.as_deref(), "Index Name")?.to_string()),
                node.total_cost,
            ));
            Ok(())
        }
        "Bitmap Index Scan" => {
            // A bitmap index scan reports only the index, so the index name
            // stands in for the relation
            let index = required(node, node.index_name.as_deref(), "Index Name")?;
            out.push(OperatorEvent::scan(
                OperatorSubtype::BitmapIndexScan,
                index,
                "",
                node.index_cond.clone().unwrap_or_default(),
                Some(index.to_string()),
                node.total_cost,
            ));
            Ok(())
        }
        "Bitmap Heap Scan" => {
            out.push(OperatorEvent::scan(
                OperatorSubtype::BitmapHeapScan,
                required(node, node.relation_name.as_deref(), "Relation Name")?,
                required(node, node.alias.as_deref(), "Alias")?,
                node.filter.clone().unwrap_or_default(),
                node.index_name.clone(),
                node.total_cost,
            ));
            // Sits above its bitmap index scans
            walk_children(node, out)
        }
        other => {
            Logger::warn("UNRECOGNIZED_PLAN_NODE", &[("node_type", other)]);
            walk_children(node, out)
        }
    }
}

fn walk_children(node: &PlanNode, out: &mut Vec<OperatorEvent>) -> PlanResult<()> {
    for child in &node.children {
        walk(child, out)?;
    }
    Ok(())
}

fn require_binary(node: &PlanNode) -> PlanResult<()> {
    if node.children.len() != 2 {
        return Err(PlanError::bad_arity(&node.node_type, node.children.len()));
    }
    Ok(())
}

fn required<'a>(
    node: &PlanNode,
    value: Option<&'a str>,
    field: &'static str,
) -> PlanResult<&'a str> {
    value.ok_or_else(|| PlanError::missing(&node.node_type, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> PlanNode {
        serde_json::from_value(value).unwrap()
    }

    fn seq_scan(rel: &str, filter: Option<&str>) -> serde_json::Value {
        let mut v = json!({
            "Node Type": "Seq Scan",
            "Total Cost": 11.7,
            "Relation Name": rel,
            "Alias": rel,
            "Output": [format!("{rel}.key")]
        });
        if let Some(f) = filter {
            v["Filter"] = json!(f);
        }
        v
    }

    #[test]
    fn test_preorder_join_before_children() {
        let plan = node(json!({
            "Node Type": "Nested Loop",
            "Total Cost": 23.17,
            "Join Filter": "(nation.n_regionkey = region.r_regionkey)",
            "Plans": [seq_scan("nation", None), seq_scan("region", None)]
        }));

        let events = normalize(&plan).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].subtype, OperatorSubtype::NestedLoop);
        assert_eq!(events[1].relation, "nation");
        assert_eq!(events[2].relation, "region");
    }

    #[test]
    fn test_nested_loop_arity_is_fatal() {
        let plan = node(json!({
            "Node Type": "Nested Loop",
            "Total Cost": 1.0,
            "Plans": [seq_scan("nation", None)]
        }));

        assert_eq!(
            normalize(&plan).unwrap_err(),
            PlanError::bad_arity("Nested Loop", 1)
        );
    }

    #[test]
    fn test_implicit_nested_loop_carries_outputs() {
        let plan = node(json!({
            "Node Type": "Nested Loop",
            "Total Cost": 23.17,
            "Plans": [seq_scan("nation", None), seq_scan("region", None)]
        }));

        let events = normalize(&plan).unwrap();
        assert!(events[0].filter.is_empty());
        assert_eq!(events[0].lhs_output, vec!["nation.key"]);
        assert_eq!(events[0].rhs_output, vec!["region.key"]);
    }

    #[test]
    fn test_index_scan_joins_cond_and_filter() {
        let plan = node(json!({
            "Node Type": "Index Scan",
            "Total Cost": 8.3,
            "Relation Name": "nation",
            "Alias": "n",
            "Index Name": "nation_pkey",
            "Index Cond": "(n.n_nationkey = 7)",
            "Filter": "(n.n_regionkey > 1)"
        }));

        let events = normalize(&plan).unwrap();
        assert_eq!(
            events[0].filter,
            "(n.n_nationkey = 7) AND (n.n_regionkey > 1)"
        );
        assert_eq!(events[0].index.as_deref(), Some("nation_pkey"));
    }

    #[test]
    fn test_index_scan_without_residual_filter() {
        let plan = node(json!({
            "Node Type": "Index Only Scan",
            "Total Cost": 4.1,
            "Relation Name": "nation",
            "Alias": "nation",
            "Index Name": "nation_pkey",
            "Index Cond": "(nation.n_nationkey = 7)"
        }));

        let events = normalize(&plan).unwrap();
        assert_eq!(events[0].subtype, OperatorSubtype::IndexOnlyScan);
        assert_eq!(events[0].filter, "(nation.n_nationkey = 7)");
    }

    #[test]
    fn test_bitmap_index_scan_borrows_index_name() {
        let plan = node(json!({
            "Node Type": "Bitmap Heap Scan",
            "Total Cost": 9.9,
            "Relation Name": "nation",
            "Alias": "nation",
            "Plans": [{
                "Node Type": "Bitmap Index Scan",
                "Total Cost": 4.2,
                "Index Name": "nation_pkey",
                "Index Cond": "(nation.n_nationkey = 7)"
            }]
        }));

        let events = normalize(&plan).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].subtype, OperatorSubtype::BitmapHeapScan);
        assert_eq!(events[1].subtype, OperatorSubtype::BitmapIndexScan);
        assert_eq!(events[1].relation, "nation_pkey");
        assert_eq!(events[1].alias, "");
    }

    #[test]
    fn test_unrecognized_nodes_pass_through() {
        let plan = node(json!({
            "Node Type": "Aggregate",
            "Total Cost": 40.0,
            "Plans": [{
                "Node Type": "Sort",
                "Total Cost": 30.0,
                "Plans": [seq_scan("lineitem", None)]
            }]
        }));

        let events = normalize(&plan).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].subtype, OperatorSubtype::SeqScan);
    }

    #[test]
    fn test_event_count_equals_join_and_scan_nodes() {
        let plan = node(json!({
            "Node Type": "Hash Join",
            "Total Cost": 50.0,
            "Hash Cond": "(a.x = b.y)",
            "Plans": [
                seq_scan("a", Some("(a.x > 1)")),
                {
                    "Node Type": "Hash",
                    "Total Cost": 20.0,
                    "Plans": [seq_scan("b", None)]
                }
            ]
        }));

        // Hash is housekeeping: 1 join + 2 scans
        let events = normalize(&plan).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_display_prefix_roundtrip() {
        for subtype in OperatorSubtype::ALL {
            assert_eq!(
                OperatorSubtype::from_display_prefix(subtype.display()),
                Some(subtype)
            );
        }
        assert_eq!(
            OperatorSubtype::from_display_prefix("Index only scan of nation"),
            Some(OperatorSubtype::IndexOnlyScan)
        );
        assert_eq!(OperatorSubtype::from_display_prefix("Gather"), None);
    }
}
