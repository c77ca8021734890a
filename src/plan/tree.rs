//! Raw plan tree as produced by `EXPLAIN (VERBOSE TRUE, FORMAT JSON)`
//!
//! Field names mirror the JSON keys the database emits; anything the
//! normalizer does not care about is silently ignored on deserialization.

use serde::Deserialize;

/// One node of a captured execution plan
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlanNode {
    /// Operator name, e.g. "Nested Loop" or "Seq Scan"
    #[serde(rename = "Node Type")]
    pub node_type: String,

    /// Planner's estimated total cost for this subtree
    #[serde(rename = "Total Cost", default)]
    pub total_cost: f64,

    /// Child plans; empty for leaf operators
    #[serde(rename = "Plans", default)]
    pub children: Vec<PlanNode>,

    /// Explicit join predicate of a nested loop
    #[serde(rename = "Join Filter", default)]
    pub join_filter: Option<String>,

    /// Hash join predicate
    #[serde(rename = "Hash Cond", default)]
    pub hash_cond: Option<String>,

    /// Merge join predicate
    #[serde(rename = "Merge Cond", default)]
    pub merge_cond: Option<String>,

    /// Index-applied portion of a scan predicate
    #[serde(rename = "Index Cond", default)]
    pub index_cond: Option<String>,

    /// Residual scan predicate
    #[serde(rename = "Filter", default)]
    pub filter: Option<String>,

    /// Scanned relation
    #[serde(rename = "Relation Name", default)]
    pub relation_name: Option<String>,

    /// Alias the statement used for the scanned relation
    #[serde(rename = "Alias", default)]
    pub alias: Option<String>,

    /// Index backing an index-family scan
    #[serde(rename = "Index Name", default)]
    pub index_name: Option<String>,

    /// Columns this node projects
    #[serde(rename = "Output", default)]
    pub output: Vec<String>,
}

impl PlanNode {
    /// Total number of nodes in this subtree, itself included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PlanNode::node_count).sum::<usize>()
    }
}

/// Top-level entry of an EXPLAIN JSON document
#[derive(Debug, Deserialize)]
struct ExplainEntry {
    #[serde(rename = "Plan")]
    plan: PlanNode,
}

/// Parses either a full EXPLAIN JSON document (`[{"Plan": {...}}]`) or a
/// bare plan node.
pub fn parse_explain_json(text: &str) -> serde_json::Result<PlanNode> {
    if let Ok(mut entries) = serde_json::from_str::<Vec<ExplainEntry>>(text) {
        if let Some(entry) = entries.pop() {
            return Ok(entry.plan);
        }
    }
    serde_json::from_str(text)
}
