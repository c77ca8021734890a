//! Plan equivalence and fragment-level rationales

use std::collections::BTreeSet;

use crate::matcher::annotation_subtype;
use crate::plan::OperatorSubtype;
use crate::reconstruct::Fragment;

use super::table::ExplanationTable;

/// Decides whether two plans are materially the same: identical operator
/// sequences, or sequences drawing on the same set of operator subtypes
/// (ordering and repetition differences alone are incidental).
pub fn plans_equivalent(reference: &[OperatorSubtype], alternative: &[OperatorSubtype]) -> bool {
    if reference == alternative {
        return true;
    }
    let lhs: BTreeSet<OperatorSubtype> = reference.iter().copied().collect();
    let rhs: BTreeSet<OperatorSubtype> = alternative.iter().copied().collect();
    lhs.symmetric_difference(&rhs).next().is_none()
}

/// For each reference fragment, the rationale to append given the
/// alternative plan's fragment at the same position. Positions past the end
/// of the alternative output, unannotated positions, and textually equal
/// annotations get `None`.
pub fn fragment_rationales(
    reference: &[Fragment],
    alternative: &[Fragment],
) -> Vec<Option<String>> {
    reference
        .iter()
        .enumerate()
        .map(|(i, frag)| alternative.get(i).and_then(|alt| rationale(frag, alt)))
        .collect()
}

fn rationale(reference: &Fragment, alternative: &Fragment) -> Option<String> {
    let ref_ann = reference.annotation.as_deref()?;
    let alt_ann = alternative.annotation.as_deref()?;
    if ref_ann == alt_ann {
        return None;
    }
    let ref_subtype = annotation_subtype(ref_ann)?;
    let alt_subtype = annotation_subtype(alt_ann)?;
    if ref_subtype == alt_subtype {
        return Some(ExplanationTable::same_operator(
            ref_subtype,
            ref_ann.contains(" = "),
        ));
    }
    // uncovered pairs report an empty rationale rather than none, so the
    // caller can still see the position differed
    Some(
        ExplanationTable::pairwise(ref_subtype, alt_subtype)
            .map(str::to_string)
            .unwrap_or_default(),
    )
}

/// Rationales when no alternative plan exists: join annotations on the
/// reference output get a fixed per-operator sentence, everything else `None`.
pub fn fallback_rationales(reference: &[Fragment]) -> Vec<Option<String>> {
    reference
        .iter()
        .map(|frag| {
            let subtype = annotation_subtype(frag.annotation.as_deref()?)?;
            ExplanationTable::join_fallback(subtype).map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{join_annotation, scan_annotation};
    use crate::plan::OperatorEvent;

    fn scan_fragment(subtype: OperatorSubtype, cost: f64) -> Fragment {
        let event = OperatorEvent::scan(subtype, "nation", "nation", "", None, cost);
        Fragment::annotated("nation", Some(scan_annotation(&event)))
    }

    fn join_fragment(subtype: OperatorSubtype, cost: f64) -> Fragment {
        let event = OperatorEvent::join(subtype, "", cost);
        Fragment::annotated(
            "nation.n_regionkey = region.r_regionkey",
            Some(join_annotation(
                &event,
                "nation.n_regionkey = region.r_regionkey",
            )),
        )
    }

    #[test]
    fn test_plan_is_equivalent_to_itself() {
        let ops = vec![
            OperatorSubtype::NestedLoop,
            OperatorSubtype::SeqScan,
            OperatorSubtype::SeqScan,
        ];
        assert!(plans_equivalent(&ops, &ops));
    }

    #[test]
    fn test_reordered_same_subtypes_are_equivalent() {
        let a = vec![OperatorSubtype::HashJoin, OperatorSubtype::SeqScan];
        let b = vec![
            OperatorSubtype::SeqScan,
            OperatorSubtype::HashJoin,
            OperatorSubtype::SeqScan,
        ];
        assert!(plans_equivalent(&a, &b));
    }

    #[test]
    fn test_new_subtype_breaks_equivalence() {
        let a = vec![OperatorSubtype::HashJoin, OperatorSubtype::SeqScan];
        let b = vec![OperatorSubtype::MergeJoin, OperatorSubtype::SeqScan];
        assert!(!plans_equivalent(&a, &b));
    }

    #[test]
    fn test_self_comparison_yields_no_rationales() {
        let fragments = vec![
            Fragment::bare("SELECT *"),
            scan_fragment(OperatorSubtype::SeqScan, 11.7),
            join_fragment(OperatorSubtype::NestedLoop, 23.17),
        ];
        let rationales = fragment_rationales(&fragments, &fragments);
        assert_eq!(rationales, vec![None, None, None]);
    }

    #[test]
    fn test_nested_loop_versus_hash_join_uses_table_entry() {
        let reference = vec![join_fragment(OperatorSubtype::NestedLoop, 23.17)];
        let alternative = vec![join_fragment(OperatorSubtype::HashJoin, 40.0)];
        let rationales = fragment_rationales(&reference, &alternative);
        assert_eq!(
            rationales[0].as_deref(),
            ExplanationTable::pairwise(OperatorSubtype::NestedLoop, OperatorSubtype::HashJoin)
        );
    }

    #[test]
    fn test_same_operator_different_cost() {
        let reference = vec![scan_fragment(OperatorSubtype::SeqScan, 11.7)];
        let alternative = vec![scan_fragment(OperatorSubtype::SeqScan, 19.0)];
        let rationales = fragment_rationales(&reference, &alternative);
        assert!(rationales[0]
            .as_deref()
            .unwrap()
            .starts_with("Both plans use a sequence scan"));
    }

    #[test]
    fn test_uncovered_pair_reports_empty_string() {
        let reference = vec![scan_fragment(OperatorSubtype::BitmapIndexScan, 4.2)];
        let alternative = vec![scan_fragment(OperatorSubtype::SeqScan, 11.7)];
        let rationales = fragment_rationales(&reference, &alternative);
        assert_eq!(rationales[0].as_deref(), Some(""));
    }

    #[test]
    fn test_fallback_touches_join_annotations_only() {
        let fragments = vec![
            Fragment::bare("FROM"),
            scan_fragment(OperatorSubtype::SeqScan, 11.7),
            join_fragment(OperatorSubtype::HashJoin, 40.0),
        ];
        let rationales = fallback_rationales(&fragments);
        assert_eq!(rationales[0], None);
        assert_eq!(rationales[1], None);
        assert!(rationales[2].as_deref().unwrap().contains("hash join"));
    }
}
