//! Deterministic SQL re-serialization
//!
//! The formatting half of the parser collaborator boundary: turns any
//! statement or expression node back into SQL text. The reconstructor
//! delegates untouched subtrees here, so reconstruction of an unannotated
//! statement must equal this writer's direct output.

use super::expr::{Expr, ExprKind};
use super::statement::{FromItem, FromSource, Statement};

/// Re-serializes statement nodes to SQL text
pub struct SqlWriter;

impl SqlWriter {
    /// Full statement text
    pub fn statement(stmt: &Statement) -> String {
        let mut out = Self::select_clause(stmt);
        if !stmt.from.is_empty() {
            out.push_str(" FROM ");
            let items: Vec<String> = stmt.from.iter().map(Self::from_item).collect();
            out.push_str(&items.join(", "));
        }
        if let Some(w) = &stmt.where_clause {
            out.push_str(" WHERE ");
            out.push_str(&Self::expr(w));
        }
        if !stmt.group_by.is_empty() {
            out.push(' ');
            out.push_str(&Self::group_by_clause(stmt));
        }
        if let Some(h) = &stmt.having {
            out.push_str(" HAVING ");
            out.push_str(&Self::expr(h));
        }
        if !stmt.order_by.is_empty() {
            out.push(' ');
            out.push_str(&Self::order_by_clause(stmt));
        }
        if let Some(limit) = stmt.limit {
            out.push_str(&format!(" LIMIT {}", limit));
        }
        out
    }

    /// The `SELECT [DISTINCT] items` clause alone
    pub fn select_clause(stmt: &Statement) -> String {
        let mut out = String::from("SELECT ");
        if stmt.distinct {
            out.push_str("DISTINCT ");
        }
        if !stmt.distinct_on.is_empty() {
            let cols: Vec<String> = stmt.distinct_on.iter().map(Self::expr).collect();
            out.push_str(&format!("DISTINCT ON ({}) ", cols.join(", ")));
        }
        let items: Vec<String> = stmt
            .select
            .iter()
            .map(|item| match &item.alias {
                Some(alias) => format!("{} AS {}", Self::expr(&item.expr), alias),
                None => Self::expr(&item.expr),
            })
            .collect();
        out.push_str(&items.join(", "));
        out
    }

    /// The `GROUP BY ...` clause alone
    pub fn group_by_clause(stmt: &Statement) -> String {
        let cols: Vec<String> = stmt.group_by.iter().map(Self::expr).collect();
        format!("GROUP BY {}", cols.join(", "))
    }

    /// The `ORDER BY ...` clause alone
    pub fn order_by_clause(stmt: &Statement) -> String {
        let cols: Vec<String> = stmt
            .order_by
            .iter()
            .map(|item| {
                if item.desc {
                    format!("{} DESC", Self::expr(&item.expr))
                } else {
                    Self::expr(&item.expr)
                }
            })
            .collect();
        format!("ORDER BY {}", cols.join(", "))
    }

    /// One from-clause entry: `value [AS alias]`
    pub fn from_item(item: &FromItem) -> String {
        let value = match &item.source {
            FromSource::Relation(name) => name.clone(),
            FromSource::Subquery(sub) => format!("({})", Self::statement(sub)),
        };
        match &item.alias {
            Some(alias) => format!("{} AS {}", value, alias),
            None => value,
        }
    }

    /// Any expression node
    pub fn expr(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Column(name) => name.clone(),
            ExprKind::Number(lexeme) => lexeme.clone(),
            ExprKind::StringLit(value) => format!("'{}'", value),
            ExprKind::DateTime { kind, value } => format!("{} '{}'", kind.keyword(), value),
            ExprKind::Star => "*".to_string(),
            ExprKind::Arith { op, operands } => {
                let parts: Vec<String> = operands.iter().map(Self::operand).collect();
                parts.join(&format!(" {} ", op.symbol()))
            }
            ExprKind::Conjunction { op, operands } => {
                let parts: Vec<String> = operands.iter().map(Self::operand).collect();
                parts.join(&format!(" {} ", op.keyword()))
            }
            ExprKind::Compare { op, lhs, rhs } => {
                format!(
                    "{} {} {}",
                    Self::operand(lhs),
                    op.symbol(),
                    Self::operand(rhs)
                )
            }
            ExprKind::Not(inner) => format!("NOT ({})", Self::expr(inner)),
            ExprKind::Exists(sub) => format!("EXISTS ({})", Self::statement(sub)),
            ExprKind::InList {
                lhs,
                items,
                negated,
            } => {
                let rendered: Vec<String> = items.iter().map(Self::expr).collect();
                format!(
                    "{} {} ({})",
                    Self::operand(lhs),
                    if *negated { "NOT IN" } else { "IN" },
                    rendered.join(", ")
                )
            }
            ExprKind::InSubquery {
                lhs,
                subquery,
                negated,
            } => {
                format!(
                    "{} {} ({})",
                    Self::operand(lhs),
                    if *negated { "NOT IN" } else { "IN" },
                    Self::statement(subquery)
                )
            }
            ExprKind::Between { operand, low, high } => {
                format!(
                    "{} BETWEEN {} AND {}",
                    Self::operand(operand),
                    Self::operand(low),
                    Self::operand(high)
                )
            }
            ExprKind::Call { func, args } => {
                let rendered: Vec<String> = args.iter().map(Self::expr).collect();
                format!("{}({})", func.to_uppercase(), rendered.join(", "))
            }
            ExprKind::Subquery(sub) => format!("({})", Self::statement(sub)),
        }
    }

    // Parenthesizes composite operands so precedence survives re-serialization
    fn operand(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Arith { .. }
            | ExprKind::Conjunction { .. }
            | ExprKind::Compare { .. }
            | ExprKind::Not(_) => format!("({})", Self::expr(e)),
            _ => Self::expr(e),
        }
    }
}
