//! CLI command implementations
//!
//! Both commands work from captured files: a plan (or two) as EXPLAIN
//! (FORMAT JSON) output and the parsed statement as JSON. The compare
//! command replays the captured alternative through the generator's
//! provider seam, so the same retry loop runs as against a live database.

use std::fs;
use std::path::Path;

use crate::altplan::{AltPlanConfig, QueuedPlanProvider};
use crate::ast::{normalize_sql_text, SqlWriter, Statement};
use crate::observability::CoverageStats;
use crate::pipeline::{annotate_query, explain_with_alternative};
use crate::plan::{parse_explain_json, PlanNode};
use crate::reconstruct::Fragment;

use super::args::Command;
use super::errors::CliResult;

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Annotate { plan, statement } => annotate(&plan, &statement),
        Command::Compare {
            plan,
            alt_plan,
            statement,
        } => compare(&plan, &alt_plan, &statement),
    }
}

/// Annotate a statement against a single plan
pub fn annotate(plan_path: &Path, statement_path: &Path) -> CliResult<()> {
    let plan = load_plan(plan_path)?;
    let statement = load_statement(statement_path)?;

    let mut stats = CoverageStats::new();
    let annotated = annotate_query(statement, &plan, &mut stats)?;

    print_fragments(&annotated.fragments, &[]);
    print_coverage(&stats);
    Ok(())
}

/// Annotate against a reference plan and a captured alternative
pub fn compare(plan_path: &Path, alt_plan_path: &Path, statement_path: &Path) -> CliResult<()> {
    let reference_plan = load_plan(plan_path)?;
    let statement = load_statement(statement_path)?;
    let sql = normalize_sql_text(&SqlWriter::statement(&statement));

    let mut provider = QueuedPlanProvider::new(reference_plan);
    provider.push_alternative(load_plan(alt_plan_path)?);

    let (comparison, stats) =
        explain_with_alternative(&mut provider, &sql, &statement, &AltPlanConfig::default())?;

    println!("reference plan:");
    print_fragments(&comparison.reference.fragments, &comparison.rationales);
    match &comparison.alternative {
        Some(alternative) => {
            println!();
            println!("alternative plan:");
            print_fragments(&alternative.fragments, &[]);
        }
        None => {
            println!();
            println!("no alternative plan available");
        }
    }
    print_coverage(&stats);
    Ok(())
}

fn load_plan(path: &Path) -> CliResult<PlanNode> {
    let text = fs::read_to_string(path)?;
    Ok(parse_explain_json(&text)?)
}

fn load_statement(path: &Path) -> CliResult<Statement> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn print_fragments(fragments: &[Fragment], rationales: &[Option<String>]) {
    let width = fragments.iter().map(|f| f.text.len()).max().unwrap_or(0);
    for (i, fragment) in fragments.iter().enumerate() {
        let rationale = rationales.get(i).and_then(Option::as_deref);
        match (&fragment.annotation, rationale) {
            (Some(annotation), Some(rationale)) if !rationale.is_empty() => {
                println!(
                    "{:width$}  -- {} {}",
                    fragment.text,
                    annotation,
                    rationale,
                    width = width
                );
            }
            (Some(annotation), _) => {
                println!("{:width$}  -- {}", fragment.text, annotation, width = width);
            }
            (None, _) => println!("{}", fragment.text),
        }
    }
}

fn print_coverage(stats: &CoverageStats) {
    println!();
    println!(
        "explained {} of {} operators ({:.0}%)",
        stats.matched_events(),
        stats.operator_events(),
        stats.matched_ratio() * 100.0
    );
}
