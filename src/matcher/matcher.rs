//! Statement-level event matching
//!
//! Locates the from-clause entry (for scans) or where-clause comparison
//! (for joins) that an operator event explains, recursing into nested
//! sub-statement sources when no top-level position matches.

use crate::ast::{FromSource, Statement};
use crate::plan::{OperatorEvent, OperatorKind};

use super::errors::{MatchError, MatchResult};
use super::phrase::scan_annotation;
use super::predicate::match_predicate;

/// Applies every event to the statement in normalizer order, returning how
/// many found a fragment to annotate.
pub fn annotate_statement(
    statement: &mut Statement,
    events: &[OperatorEvent],
) -> MatchResult<usize> {
    let mut matched = 0;
    for event in events {
        if match_event(statement, event)? {
            matched += 1;
        }
    }
    Ok(matched)
}

/// Matches a single event against the statement.
pub fn match_event(statement: &mut Statement, event: &OperatorEvent) -> MatchResult<bool> {
    match event.kind {
        OperatorKind::Join => match_join(statement, event),
        OperatorKind::Scan => match_scan(statement, event),
    }
}

fn match_join(statement: &mut Statement, event: &OperatorEvent) -> MatchResult<bool> {
    if let Some(where_clause) = statement.where_clause.as_mut() {
        if event.filter.is_empty() {
            // Implicit equi-join: enumerate every lhs = rhs candidate from
            // the children's projections and test each as if it were the
            // plan's filter. More than one match means the statement is
            // ambiguous relative to the plan.
            let mut matched_conditions = Vec::new();
            for lhs in &event.lhs_output {
                for rhs in &event.rhs_output {
                    let condition = format!("{} = {}", lhs, rhs);
                    let candidate = event.with_filter(condition.clone());
                    if match_predicate(where_clause, &candidate)? {
                        matched_conditions.push(condition);
                    }
                }
            }
            if matched_conditions.len() > 1 {
                return Err(MatchError::AmbiguousJoin {
                    candidates: matched_conditions,
                });
            }
            if matched_conditions.len() == 1 {
                return Ok(true);
            }
        } else if match_predicate(where_clause, event)? {
            return Ok(true);
        }
    }

    // No top-level position matched: try nested sub-statement sources
    for item in &mut statement.from {
        if let FromSource::Subquery(sub) = &mut item.source {
            if match_join(sub, event)? {
                item.expand = true;
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn match_scan(statement: &mut Statement, event: &OperatorEvent) -> MatchResult<bool> {
    let mut annotated = false;

    for item in &mut statement.from {
        match &mut item.source {
            FromSource::Relation(name) => {
                if item.annotation.is_some() {
                    continue; // first match wins
                }
                let alias_matches = match &item.alias {
                    // A bare name only matches a scan with no explicit alias
                    None => event.alias == event.relation,
                    Some(alias) => *alias == event.alias,
                };
                if *name == event.relation && alias_matches {
                    item.annotation = Some(scan_annotation(event));
                    annotated = true;
                    break;
                }
            }
            FromSource::Subquery(sub) => {
                if match_scan(sub, event)? {
                    item.expand = true;
                    annotated = true;
                }
            }
        }
    }

    // Route into predicate matching to annotate the comparison the scan's
    // filter came from
    if !event.filter.is_empty() {
        if let Some(where_clause) = statement.where_clause.as_mut() {
            match_predicate(where_clause, event)?;
        }
    }
    Ok(annotated)
}
