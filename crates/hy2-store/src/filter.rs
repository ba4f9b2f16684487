//! Typed predicate builder for store queries.
//!
//! Column names and expressions are `&'static str` literals supplied at the
//! call site; every runtime value travels as a bound parameter. Nothing
//! user-controlled is ever interpolated into SQL text.

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// A bindable predicate value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// An AND-composed predicate with positional bound parameters.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<String>,
    binds: Vec<Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn eq(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.cmp(column, "=", value)
    }

    /// `column < ?`
    pub fn lt(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.cmp(column, "<", value)
    }

    /// `column > ?`
    pub fn gt(self, column: &'static str, value: impl Into<Value>) -> Self {
        self.cmp(column, ">", value)
    }

    fn cmp(mut self, column: &'static str, op: &'static str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{column} {op} ?"));
        self.binds.push(value.into());
        self
    }

    /// Compare a column against a static column expression, e.g.
    /// `gt_expr("quota", "download + upload")`.
    pub fn gt_expr(mut self, column: &'static str, expr: &'static str) -> Self {
        self.clauses.push(format!("{column} > {expr}"));
        self
    }

    /// `column IN (?, ...)` over a bound id set. An empty set matches
    /// nothing rather than producing invalid SQL.
    pub fn in_ids(mut self, column: &'static str, ids: &[i64]) -> Self {
        if ids.is_empty() {
            self.clauses.push("1 = 0".to_string());
            return self;
        }
        let marks = vec!["?"; ids.len()].join(", ");
        self.clauses.push(format!("{column} IN ({marks})"));
        self.binds.extend(ids.iter().copied().map(Value::Int));
        self
    }

    /// OR-join the clauses of `inner` into one parenthesized clause.
    pub fn or_group(mut self, inner: Filter) -> Self {
        if inner.clauses.is_empty() {
            return self;
        }
        self.clauses.push(format!("({})", inner.clauses.join(" OR ")));
        self.binds.extend(inner.binds);
        self
    }

    /// The `WHERE` body. A filter with no clauses matches everything.
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            "1 = 1".to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    /// Apply the binds to `query` in clause order.
    pub(crate) fn bind_to<'q>(
        &'q self,
        mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        for value in &self.binds {
            query = match value {
                Value::Int(v) => query.bind(*v),
                Value::Text(v) => query.bind(v.as_str()),
            };
        }
        query
    }
}
