//! Static rationale lookup
//!
//! Maps an ordered (reference, alternative) operator-subtype pair to a fixed
//! sentence explaining why the planner preferred the reference operator. The
//! pair is ordered: `(NestedLoop, HashJoin)` reads "a nested loop was chosen
//! where the forced plan used a hash join".

use crate::plan::OperatorSubtype;

/// Fixed rationale sentences keyed by operator subtype pairs.
pub struct ExplanationTable;

impl ExplanationTable {
    /// Rationale for a position where the reference plan uses `reference`
    /// and the forced alternative uses `alternative`. `None` when the pair
    /// is not covered.
    pub fn pairwise(
        reference: OperatorSubtype,
        alternative: OperatorSubtype,
    ) -> Option<&'static str> {
        use OperatorSubtype::*;
        let text = match (reference, alternative) {
            (NestedLoop, HashJoin) => {
                "Nested loop is preferred over hash join here: one input is small \
                 enough that probing it directly costs less than building a hash table."
            }
            (NestedLoop, MergeJoin) => {
                "Nested loop is preferred over merge join here: the inputs are not \
                 sorted on the join key and one side is small, so sorting would not pay off."
            }
            (HashJoin, NestedLoop) => {
                "Hash join is preferred over nested loop here: the inner relation is \
                 large, so one hash build beats rescanning it for every outer row."
            }
            (HashJoin, MergeJoin) => {
                "Hash join is preferred over merge join here: neither input arrives \
                 sorted on the join key, so hashing avoids two sorts."
            }
            (MergeJoin, NestedLoop) => {
                "Merge join is preferred over nested loop here: both inputs are \
                 already ordered on the join key, so a single merge pass suffices."
            }
            (MergeJoin, HashJoin) => {
                "Merge join is preferred over hash join here: both inputs are already \
                 ordered on the join key, so merging skips the hash build entirely."
            }
            (SeqScan, IndexScan) | (SeqScan, IndexOnlyScan) => {
                "Sequential scan is preferred over the index here: the predicate \
                 keeps enough of the relation that reading it straight through beats \
                 random index probes."
            }
            (SeqScan, BitmapHeapScan) => {
                "Sequential scan is preferred over the bitmap scan here: the \
                 predicate is not selective enough to make gathering matching pages \
                 worthwhile."
            }
            (IndexScan, SeqScan) => {
                "Index scan is preferred over sequential scan here: the predicate is \
                 selective, so a few index probes beat reading the whole relation."
            }
            (IndexScan, BitmapHeapScan) => {
                "Index scan is preferred over the bitmap scan here: few enough rows \
                 match that direct probes need no page batching."
            }
            (IndexOnlyScan, SeqScan) => {
                "Index only scan is preferred over sequential scan here: the index \
                 covers every referenced column, so the relation itself is never read."
            }
            (IndexOnlyScan, IndexScan) => {
                "Index only scan is preferred over a plain index scan here: the index \
                 covers every referenced column, so no heap lookups are needed."
            }
            (BitmapHeapScan, SeqScan) => {
                "Bitmap heap scan is preferred over sequential scan here: matching \
                 pages are collected first and then read in order, cheaper than a \
                 full pass."
            }
            (BitmapHeapScan, IndexScan) => {
                "Bitmap heap scan is preferred over a plain index scan here: enough \
                 rows match that batching page reads beats one probe per row."
            }
            _ => return None,
        };
        Some(text)
    }

    /// Rationale for a position where both plans kept the same operator but
    /// the annotations differ (typically only in cost).
    pub fn same_operator(subtype: OperatorSubtype, equality: bool) -> String {
        let name = subtype.display().to_lowercase();
        if subtype.is_join() && equality {
            format!(
                "Both plans use a {} for this equality join; only the estimated cost differs.",
                name
            )
        } else {
            format!(
                "Both plans use a {} here; only the estimated cost differs.",
                name
            )
        }
    }

    /// Per-operator rationale appended when no alternative plan could be
    /// produced at all. Joins only.
    pub fn join_fallback(subtype: OperatorSubtype) -> Option<&'static str> {
        use OperatorSubtype::*;
        let text = match subtype {
            NestedLoop => {
                "No alternative plan was found; a nested loop is typically kept when \
                 one input is very small."
            }
            HashJoin => {
                "No alternative plan was found; a hash join is typically kept when \
                 neither input is sorted and the inner side fits in memory."
            }
            MergeJoin => {
                "No alternative plan was found; a merge join is typically kept when \
                 both inputs are already ordered on the join key."
            }
            _ => return None,
        };
        Some(text)
    }
}
