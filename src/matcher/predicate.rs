//! Predicate-tree matching
//!
//! Walks a where/having predicate looking for the comparison a plan filter
//! came from. Comparisons are rendered to text in both orientations (the
//! operator and its mirror) and checked by substring containment against
//! the plan's filter text; this deliberately mirrors how the database
//! prints filters rather than attempting structural equality.

use crate::ast::{Expr, ExprKind};
use crate::observability::Logger;
use crate::plan::{OperatorEvent, OperatorKind};

use super::errors::{MatchError, MatchResult};
use super::matcher::match_event;
use super::phrase::{join_annotation, scan_annotation};

// Sentence for a comparison node, by the kind of event that matched it
fn comparison_annotation(event: &OperatorEvent) -> String {
    match event.kind {
        OperatorKind::Join => join_annotation(event, &event.filter),
        OperatorKind::Scan => scan_annotation(event),
    }
}

/// Tries to attach the event's annotation somewhere in the predicate tree.
/// Returns whether anything below (or at) this node was annotated; a `true`
/// return has already set `expand` on every node between the annotation
/// site and this one.
pub(crate) fn match_predicate(expr: &mut Expr, event: &OperatorEvent) -> MatchResult<bool> {
    // first match wins
    if expr.annotation.is_some() {
        return Ok(false);
    }

    match &mut expr.kind {
        ExprKind::Conjunction { operands, .. } => {
            let mut hit = false;
            // every operand is tried; success on any marks the conjunction
            for operand in operands.iter_mut() {
                hit |= match_predicate(operand, event)?;
            }
            if hit {
                expr.expand = true;
            }
            Ok(hit)
        }
        ExprKind::Compare { op, lhs, rhs } => {
            let op = *op;
            let mut nested = false;
            let left = render_operand(lhs, event, &mut nested)?;
            let right = render_operand(rhs, event, &mut nested)?;
            if nested {
                // a placeholder operand resolved deeper in the tree
                expr.expand = true;
            }

            let forward = format!("{}{}{}", left, op.plan_spelling(), right);
            let backward = format!("{}{}{}", right, op.mirror().plan_spelling(), left);
            if event.filter.contains(&forward) || event.filter.contains(&backward) {
                expr.annotation = Some(comparison_annotation(event));
                Ok(true)
            } else {
                Ok(nested)
            }
        }
        ExprKind::Exists(sub) => {
            if match_event(sub, event)? {
                expr.expand = true;
                Ok(true)
            } else {
                Ok(false)
            }
        }
        ExprKind::Not(inner) => {
            if match_predicate(inner, event)? {
                expr.expand = true;
                Ok(true)
            } else {
                Ok(false)
            }
        }
        ExprKind::InSubquery { subquery, .. } => {
            // a correlated subquery behaves like an equi-join source
            if match_event(subquery, event)? {
                expr.expand = true;
                Ok(true)
            } else {
                Ok(false)
            }
        }
        // static membership tests never explain a scan or join
        ExprKind::InList { .. } => Ok(false),
        ExprKind::Between { .. } => {
            Logger::debug("BETWEEN_PREDICATE_SKIPPED", &[("filter", event.filter.as_str())]);
            Ok(false)
        }
        other => Err(MatchError::UnsupportedPredicate(other.describe())),
    }
}

// Renders a comparison operand the way the database prints it in filter
// text. Operands that cannot be rendered inline become a `$` placeholder;
// a sub-statement placeholder is additionally matched recursively so
// derived-column filters still annotate.
fn render_operand(
    operand: &mut Expr,
    event: &OperatorEvent,
    nested: &mut bool,
) -> MatchResult<String> {
    match &mut operand.kind {
        ExprKind::Column(name) => Ok(name.clone()),
        ExprKind::Number(lexeme) => Ok(lexeme.clone()),
        ExprKind::StringLit(value) => Ok(format!("'{}'", value)),
        ExprKind::DateTime { value, .. } => Ok(format!("'{}'", value)),
        ExprKind::Subquery(sub) => {
            if match_event(sub, event)? {
                *nested = true;
            }
            Ok("$".to_string())
        }
        _ => Ok("$".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use crate::ast::{FromItem, Statement};
    use crate::plan::OperatorSubtype;

    fn scan_with_filter(filter: &str) -> OperatorEvent {
        OperatorEvent::scan(OperatorSubtype::SeqScan, "nation", "n", filter, None, 11.7)
    }

    #[test]
    fn test_comparison_matches_forward_orientation() {
        let mut expr = Expr::compare(
            CompareOp::Gt,
            Expr::column("n.n_nationkey"),
            Expr::number("7"),
        );
        assert!(match_predicate(&mut expr, &scan_with_filter("(n.n_nationkey > 7)")).unwrap());
        assert!(expr.annotation.is_some());
        assert!(!expr.expand);
    }

    #[test]
    fn test_comparison_matches_mirrored_orientation() {
        // statement says 0 < key, plan prints key > 0
        let mut expr = Expr::compare(
            CompareOp::Lt,
            Expr::number("0"),
            Expr::column("n.n_regionkey"),
        );
        assert!(match_predicate(&mut expr, &scan_with_filter("(n.n_regionkey > 0)")).unwrap());
    }

    #[test]
    fn test_date_literal_renders_quoted() {
        let mut expr = Expr::compare(
            CompareOp::Gte,
            Expr::column("lineitem.l_shipdate"),
            Expr::date_time(crate::ast::DateTimeKind::Date, "1994-01-01"),
        );
        let event = OperatorEvent::scan(
            OperatorSubtype::SeqScan,
            "lineitem",
            "lineitem",
            "(lineitem.l_shipdate >= '1994-01-01'::date)",
            None,
            100.0,
        );
        assert!(match_predicate(&mut expr, &event).unwrap());
    }

    #[test]
    fn test_conjunction_marks_expand_and_reports_success() {
        let mut expr = Expr::and(vec![
            Expr::compare(
                CompareOp::Eq,
                Expr::column("n.n_regionkey"),
                Expr::number("0"),
            ),
            Expr::compare(
                CompareOp::Lt,
                Expr::column("n.n_nationkey"),
                Expr::number("30"),
            ),
        ]);
        assert!(match_predicate(&mut expr, &scan_with_filter("(n.n_regionkey = 0)")).unwrap());
        assert!(expr.expand);
        let ExprKind::Conjunction { operands, .. } = &expr.kind else {
            unreachable!()
        };
        assert!(operands[0].annotation.is_some());
        assert!(operands[1].annotation.is_none());
    }

    #[test]
    fn test_annotated_node_is_not_revisited() {
        let mut expr = Expr::compare(
            CompareOp::Eq,
            Expr::column("n.n_regionkey"),
            Expr::number("0"),
        );
        expr.annotation = Some("already explained".into());
        assert!(!match_predicate(&mut expr, &scan_with_filter("(n.n_regionkey = 0)")).unwrap());
        assert_eq!(expr.annotation.as_deref(), Some("already explained"));
    }

    #[test]
    fn test_between_reports_no_match() {
        let mut expr = Expr::between(
            Expr::column("l.l_discount"),
            Expr::number("0.05"),
            Expr::number("0.07"),
        );
        let matched = match_predicate(
            &mut expr,
            &scan_with_filter("(l.l_discount >= 0.05) AND (l.l_discount <= 0.07)"),
        )
        .unwrap();
        assert!(!matched);
        assert!(expr.annotation.is_none());
    }

    #[test]
    fn test_unsupported_shape_is_fatal() {
        let mut expr = Expr::column("n.n_regionkey");
        let err = match_predicate(&mut expr, &scan_with_filter("(n.n_regionkey = 0)")).unwrap_err();
        assert_eq!(err, MatchError::UnsupportedPredicate("column reference"));
    }

    #[test]
    fn test_placeholder_subquery_resolves_nested_scan() {
        // ps_supplycost = (SELECT MIN(...) FROM partsupp) matched against
        // the inner partsupp scan
        let inner = Statement::select(vec![crate::ast::SelectItem::expr(Expr::call(
            "min",
            vec![Expr::column("partsupp.ps_supplycost")],
        ))])
        .with_from(FromItem::relation("partsupp"));

        let mut expr = Expr::compare(
            CompareOp::Eq,
            Expr::column("partsupp.ps_supplycost"),
            Expr::subquery(inner),
        );

        let event = OperatorEvent::scan(
            OperatorSubtype::SeqScan,
            "partsupp",
            "partsupp",
            "",
            None,
            50.0,
        );
        // inner from-entry annotated, comparison expanded, no match on the
        // comparison itself
        assert!(match_predicate(&mut expr, &event).unwrap());
        assert!(expr.expand);
        assert!(expr.annotation.is_none());
        let ExprKind::Compare { rhs, .. } = &expr.kind else {
            unreachable!()
        };
        let ExprKind::Subquery(sub) = &rhs.kind else {
            unreachable!()
        };
        assert!(sub.from[0].annotation.is_some());
    }

    #[test]
    fn test_exists_recursion_sets_expand() {
        let inner = Statement::select_star()
            .with_from(FromItem::relation("region"))
            .with_where(Expr::compare(
                CompareOp::Eq,
                Expr::column("region.r_regionkey"),
                Expr::column("nation.n_regionkey"),
            ));
        let mut expr = Expr::exists(inner);

        let event = OperatorEvent::scan(
            OperatorSubtype::SeqScan,
            "region",
            "region",
            "",
            None,
            1.05,
        );
        assert!(match_predicate(&mut expr, &event).unwrap());
        assert!(expr.expand);
    }
}
