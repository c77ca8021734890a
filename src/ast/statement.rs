//! Statement-level nodes of the parsed tree

use serde::{Deserialize, Serialize};

use super::expr::Expr;

/// One entry of a select list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub expr: Expr,
    #[serde(default)]
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn expr(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }

    pub fn star() -> Self {
        Self::expr(Expr::star())
    }
}

/// One entry of an ORDER BY list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub expr: Expr,
    #[serde(default)]
    pub desc: bool,
}

impl OrderItem {
    pub fn asc(expr: Expr) -> Self {
        Self { expr, desc: false }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { expr, desc: true }
    }
}

/// What a from-clause entry reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromSource {
    /// A named relation
    Relation(String),
    /// A nested sub-statement source
    Subquery(Box<Statement>),
}

/// One from-clause entry, carrying the pipeline-private attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromItem {
    pub source: FromSource,
    /// Explicit alias; a bare relation name has none
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub expand: bool,
}

impl FromItem {
    /// A bare relation name with no explicit alias
    pub fn relation(name: impl Into<String>) -> Self {
        Self {
            source: FromSource::Relation(name.into()),
            alias: None,
            annotation: None,
            expand: false,
        }
    }

    /// `relation AS alias`
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            source: FromSource::Relation(name.into()),
            alias: Some(alias.into()),
            annotation: None,
            expand: false,
        }
    }

    /// `(SELECT ...) AS alias`
    pub fn subquery(statement: Statement, alias: impl Into<String>) -> Self {
        Self {
            source: FromSource::Subquery(Box::new(statement)),
            alias: Some(alias.into()),
            annotation: None,
            expand: false,
        }
    }

    /// Number of annotated nodes in this entry, nested statements included
    pub fn annotation_count(&self) -> usize {
        let own = usize::from(self.annotation.is_some());
        let below = match &self.source {
            FromSource::Relation(_) => 0,
            FromSource::Subquery(sub) => sub.annotation_count(),
        };
        own + below
    }
}

/// A parsed SQL select statement, exclusively owned by one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub select: Vec<SelectItem>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub distinct_on: Vec<Expr>,
    #[serde(default)]
    pub from: Vec<FromItem>,
    #[serde(default)]
    pub where_clause: Option<Expr>,
    #[serde(default)]
    pub group_by: Vec<Expr>,
    #[serde(default)]
    pub having: Option<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderItem>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl Statement {
    /// Creates a statement with the given select list and nothing else
    pub fn select(select: Vec<SelectItem>) -> Self {
        Self {
            select,
            distinct: false,
            distinct_on: Vec::new(),
            from: Vec::new(),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// `SELECT *`
    pub fn select_star() -> Self {
        Self::select(vec![SelectItem::star()])
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn with_from(mut self, item: FromItem) -> Self {
        self.from.push(item);
        self
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    pub fn with_group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn with_having(mut self, expr: Expr) -> Self {
        self.having = Some(expr);
        self
    }

    pub fn with_order_by(mut self, items: Vec<OrderItem>) -> Self {
        self.order_by = items;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of annotated nodes in the whole statement tree
    pub fn annotation_count(&self) -> usize {
        let select: usize = self.select.iter().map(|i| i.expr.annotation_count()).sum();
        let from: usize = self.from.iter().map(FromItem::annotation_count).sum();
        let where_c = self.where_clause.as_ref().map_or(0, Expr::annotation_count);
        let group: usize = self.group_by.iter().map(Expr::annotation_count).sum();
        let having = self.having.as_ref().map_or(0, Expr::annotation_count);
        let order: usize = self.order_by.iter().map(|i| i.expr.annotation_count()).sum();
        select + from + where_c + group + having + order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;

    #[test]
    fn test_builder() {
        let stmt = Statement::select_star()
            .with_from(FromItem::relation("nation"))
            .with_where(Expr::compare(
                CompareOp::Eq,
                Expr::column("nation.n_regionkey"),
                Expr::number("0"),
            ))
            .with_limit(10);

        assert_eq!(stmt.from.len(), 1);
        assert!(stmt.where_clause.is_some());
        assert_eq!(stmt.limit, Some(10));
        assert_eq!(stmt.annotation_count(), 0);
    }

    #[test]
    fn test_annotation_count_includes_from_and_subqueries() {
        let mut inner = Statement::select_star().with_from(FromItem::relation("nation"));
        inner.from[0].annotation = Some("inner scan".into());

        let mut stmt = Statement::select_star().with_from(FromItem::subquery(inner, "n"));
        stmt.from[0].annotation = Some("outer".into());

        assert_eq!(stmt.annotation_count(), 2);
    }

    #[test]
    fn test_statement_json_roundtrip() {
        let stmt = Statement::select_star()
            .with_from(FromItem::aliased("nation", "n"))
            .with_where(Expr::compare(
                CompareOp::Lt,
                Expr::column("n.n_regionkey"),
                Expr::number("3"),
            ));

        let text = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&text).unwrap();
        assert_eq!(stmt, back);
    }
}
