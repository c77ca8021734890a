//! Expression nodes of the statement tree

use serde::{Deserialize, Serialize};

use super::statement::Statement;

/// Comparison operators the matcher understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
    Neq,
    Gte,
    Lte,
    Like,
    NotLike,
}

impl CompareOp {
    /// SQL spelling used when writing statements back out
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
            CompareOp::Neq => "<>",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }

    /// Spelling of this operator inside the database's plan filter text,
    /// padded for substring matching (`LIKE` appears as `~~` there)
    pub fn plan_spelling(&self) -> &'static str {
        match self {
            CompareOp::Gt => " > ",
            CompareOp::Lt => " < ",
            CompareOp::Eq => " = ",
            CompareOp::Neq => " <> ",
            CompareOp::Gte => " >= ",
            CompareOp::Lte => " <= ",
            CompareOp::Like => " ~~ ",
            CompareOp::NotLike => " !~~ ",
        }
    }

    /// The operator that expresses the same predicate with its operands
    /// swapped
    pub fn mirror(&self) -> CompareOp {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Gte => CompareOp::Lte,
            CompareOp::Lte => CompareOp::Gte,
            other => *other,
        }
    }

    /// Returns true for `=`
    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq)
    }
}

/// Conjunction operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConjOp {
    And,
    Or,
}

impl ConjOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            ConjOp::And => "AND",
            ConjOp::Or => "OR",
        }
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

/// Date/time literal flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateTimeKind {
    Date,
    Time,
    Timestamp,
    Interval,
}

impl DateTimeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DateTimeKind::Date => "DATE",
            DateTimeKind::Time => "TIME",
            DateTimeKind::Timestamp => "TIMESTAMP",
            DateTimeKind::Interval => "INTERVAL",
        }
    }
}

/// One expression node: its shape plus the two pipeline-private attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    /// Annotation attached by the matcher; at most one per node, first
    /// match wins
    #[serde(default)]
    pub annotation: Option<String>,
    /// Set when this node or any descendant was annotated; tells the
    /// reconstructor to recurse instead of delegating to the writer
    #[serde(default)]
    pub expand: bool,
}

/// Expression shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Column reference, stored fully qualified (`nation.n_regionkey`)
    Column(String),
    /// Numeric literal, lexeme preserved as written
    Number(String),
    /// String literal, unquoted
    StringLit(String),
    /// Date/time literal, e.g. `DATE '1994-01-01'`
    DateTime { kind: DateTimeKind, value: String },
    /// `*` in a select list or `COUNT(*)`
    Star,
    /// N-ary arithmetic chain
    Arith { op: ArithOp, operands: Vec<Expr> },
    /// N-ary `AND`/`OR` chain
    Conjunction { op: ConjOp, operands: Vec<Expr> },
    /// Binary comparison
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Negated predicate
    Not(Box<Expr>),
    /// `EXISTS (SELECT ...)`
    Exists(Box<Statement>),
    /// `lhs [NOT] IN (literal, ...)`
    InList {
        lhs: Box<Expr>,
        items: Vec<Expr>,
        negated: bool,
    },
    /// `lhs [NOT] IN (SELECT ...)`
    InSubquery {
        lhs: Box<Expr>,
        subquery: Box<Statement>,
        negated: bool,
    },
    /// `operand BETWEEN low AND high`
    Between {
        operand: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    /// Function call, aggregates included (`SUM(...)`, `COUNT(*)`)
    Call { func: String, args: Vec<Expr> },
    /// Scalar sub-statement used as an operand
    Subquery(Box<Statement>),
}

impl ExprKind {
    /// Short human name for diagnostics and errors
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Column(_) => "column reference",
            ExprKind::Number(_) => "numeric literal",
            ExprKind::StringLit(_) => "string literal",
            ExprKind::DateTime { .. } => "date/time literal",
            ExprKind::Star => "star",
            ExprKind::Arith { .. } => "arithmetic expression",
            ExprKind::Conjunction { .. } => "conjunction",
            ExprKind::Compare { .. } => "comparison",
            ExprKind::Not(_) => "negation",
            ExprKind::Exists(_) => "EXISTS predicate",
            ExprKind::InList { .. } => "IN list",
            ExprKind::InSubquery { .. } => "IN subquery",
            ExprKind::Between { .. } => "BETWEEN predicate",
            ExprKind::Call { .. } => "function call",
            ExprKind::Subquery(_) => "scalar subquery",
        }
    }
}

impl Expr {
    /// Wraps a shape into a node with no annotation and no expand flag
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            annotation: None,
            expand: false,
        }
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(name.into()))
    }

    pub fn number(lexeme: impl Into<String>) -> Self {
        Self::new(ExprKind::Number(lexeme.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::StringLit(value.into()))
    }

    pub fn date_time(kind: DateTimeKind, value: impl Into<String>) -> Self {
        Self::new(ExprKind::DateTime {
            kind,
            value: value.into(),
        })
    }

    pub fn star() -> Self {
        Self::new(ExprKind::Star)
    }

    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn conjunction(op: ConjOp, operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::Conjunction { op, operands })
    }

    pub fn and(operands: Vec<Expr>) -> Self {
        Self::conjunction(ConjOp::And, operands)
    }

    pub fn or(operands: Vec<Expr>) -> Self {
        Self::conjunction(ConjOp::Or, operands)
    }

    pub fn arith(op: ArithOp, operands: Vec<Expr>) -> Self {
        Self::new(ExprKind::Arith { op, operands })
    }

    pub fn not(inner: Expr) -> Self {
        Self::new(ExprKind::Not(Box::new(inner)))
    }

    pub fn exists(statement: Statement) -> Self {
        Self::new(ExprKind::Exists(Box::new(statement)))
    }

    pub fn in_list(lhs: Expr, items: Vec<Expr>, negated: bool) -> Self {
        Self::new(ExprKind::InList {
            lhs: Box::new(lhs),
            items,
            negated,
        })
    }

    pub fn in_subquery(lhs: Expr, subquery: Statement, negated: bool) -> Self {
        Self::new(ExprKind::InSubquery {
            lhs: Box::new(lhs),
            subquery: Box::new(subquery),
            negated,
        })
    }

    pub fn between(operand: Expr, low: Expr, high: Expr) -> Self {
        Self::new(ExprKind::Between {
            operand: Box::new(operand),
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            func: func.into(),
            args,
        })
    }

    pub fn subquery(statement: Statement) -> Self {
        Self::new(ExprKind::Subquery(Box::new(statement)))
    }

    /// Number of annotated nodes in this subtree, sub-statements included
    pub fn annotation_count(&self) -> usize {
        let own = usize::from(self.annotation.is_some());
        let below = match &self.kind {
            ExprKind::Arith { operands, .. } | ExprKind::Conjunction { operands, .. } => {
                operands.iter().map(Expr::annotation_count).sum()
            }
            ExprKind::Compare { lhs, rhs, .. } => lhs.annotation_count() + rhs.annotation_count(),
            ExprKind::Not(inner) => inner.annotation_count(),
            ExprKind::Exists(sub) | ExprKind::Subquery(sub) => sub.annotation_count(),
            ExprKind::InList { lhs, items, .. } => {
                lhs.annotation_count() + items.iter().map(Expr::annotation_count).sum::<usize>()
            }
            ExprKind::InSubquery { lhs, subquery, .. } => {
                lhs.annotation_count() + subquery.annotation_count()
            }
            ExprKind::Between { operand, low, high } => {
                operand.annotation_count() + low.annotation_count() + high.annotation_count()
            }
            ExprKind::Call { args, .. } => args.iter().map(Expr::annotation_count).sum(),
            ExprKind::Column(_)
            | ExprKind::Number(_)
            | ExprKind::StringLit(_)
            | ExprKind::DateTime { .. }
            | ExprKind::Star => 0,
        };
        own + below
    }
}
