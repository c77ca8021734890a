//! Annotation sentence construction and parsing
//!
//! The comparator later re-parses the leading operator subtype out of these
//! sentences, so the two fixed prefixes here ("Filtered by ..." for scans,
//! "Perform ..." for joins) are load-bearing: build and parse stay in this
//! one module.

use crate::plan::{OperatorEvent, OperatorSubtype};

const SCAN_PREFIX: &str = "Filtered by ";
const JOIN_PREFIX: &str = "Perform ";

/// Sentence attached to the from-clause entry (or where-clause comparison)
/// a scan event matched.
pub fn scan_annotation(event: &OperatorEvent) -> String {
    let mut text = if !event.alias.is_empty() && event.alias != event.relation {
        format!(
            "{}{} of {} as {}, total cost is {}.",
            SCAN_PREFIX,
            event.subtype.display(),
            event.relation,
            event.alias,
            event.cost
        )
    } else {
        format!(
            "{}{} of {}, total cost is {}.",
            SCAN_PREFIX,
            event.subtype.display(),
            event.relation,
            event.cost
        )
    };
    if let Some(why) = why_chosen(event) {
        text.push(' ');
        text.push_str(&why);
    }
    text
}

/// Sentence attached to the comparison a join event matched. The filter is
/// passed separately because implicit joins substitute an inferred
/// candidate condition.
pub fn join_annotation(event: &OperatorEvent, filter: &str) -> String {
    format!(
        "{}{} on {}, total cost is {}.",
        JOIN_PREFIX,
        event.subtype.display(),
        filter,
        event.cost
    )
}

// Why-chosen suffix for index-backed scans
fn why_chosen(event: &OperatorEvent) -> Option<String> {
    let index = event.index.as_deref()?;
    match event.subtype {
        OperatorSubtype::IndexScan | OperatorSubtype::IndexOnlyScan => {
            Some(format!("This is used because index ({}) exists.", index))
        }
        OperatorSubtype::BitmapIndexScan | OperatorSubtype::BitmapHeapScan => {
            Some(format!("This is used because an index ({}) exists.", index))
        }
        _ => None,
    }
}

/// Extracts the operator subtype a previously built annotation sentence
/// leads with; `None` for free-form text.
pub fn annotation_subtype(text: &str) -> Option<OperatorSubtype> {
    let rest = text
        .strip_prefix(SCAN_PREFIX)
        .or_else(|| text.strip_prefix(JOIN_PREFIX))?;
    OperatorSubtype::from_display_prefix(rest)
}
