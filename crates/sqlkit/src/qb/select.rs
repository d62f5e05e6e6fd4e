//! SELECT statement builder with MySQL-style positional placeholders.

use crate::qb::clause::{JoinKind, Op};
use crate::qb::query::Query;
use crate::qb::value::{Arg, WhereValue};
use std::fmt::Display;

/// SELECT query builder.
///
/// Every clause call appends immediately; `build` renders the clauses in
/// fixed SQL order regardless of call order.
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    /// SELECT columns
    select_cols: Vec<String>,
    /// FROM expression
    from_expr: String,
    /// Rendered JOIN clauses
    join_clauses: Vec<String>,
    /// Rendered WHERE predicates
    predicates: Vec<String>,
    /// Arguments, aligned with the placeholders in `predicates`
    args: Vec<Arg>,
    /// GROUP BY fields
    group_by: Vec<String>,
    /// ORDER BY fields
    order_by: Vec<String>,
    /// Rendered `offset,limit`
    limit: Option<String>,
}

impl QueryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== SELECT / FROM ====================

    /// Append one SELECT column or expression.
    pub fn select(mut self, col: &str) -> Self {
        self.select_cols.push(col.to_string());
        self
    }

    /// Append multiple SELECT columns.
    pub fn select_cols(mut self, cols: &[&str]) -> Self {
        self.select_cols.extend(cols.iter().map(|c| c.to_string()));
        self
    }

    /// Set the FROM expression. The last call wins.
    pub fn from(mut self, source: &str) -> Self {
        self.from_expr = source.to_string();
        self
    }

    // ==================== JOIN ====================

    /// Add a JOIN clause: `<KIND> <target> ON <condition>`.
    pub fn join(mut self, kind: JoinKind, target: &str, condition: &str) -> Self {
        self.join_clauses
            .push(format!("{} {} ON {}", kind.keyword(), target, condition));
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, target: &str, condition: &str) -> Self {
        self.join(JoinKind::Inner, target, condition)
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, target: &str, condition: &str) -> Self {
        self.join(JoinKind::Left, target, condition)
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, target: &str, condition: &str) -> Self {
        self.join(JoinKind::Right, target, condition)
    }

    /// Add FULL JOIN.
    pub fn full_join(self, target: &str, condition: &str) -> Self {
        self.join(JoinKind::Full, target, condition)
    }

    // ==================== WHERE ====================

    /// Add a WHERE predicate, AND-combined with the others.
    ///
    /// What gets rendered depends on the shape of `value`:
    /// - a scalar renders `field op ?`, unless it is empty text, in which
    ///   case the predicate is dropped
    /// - `None` drops the predicate
    /// - a list with [`Op::In`] renders `field IN(?,?,...)`; an empty list,
    ///   or any other operator, drops the predicate
    /// - a list of tuples with [`Op::In`] renders `field IN((?,?),(?,?))`
    ///
    /// # Example
    /// ```ignore
    /// let q = QueryBuilder::new()
    ///     .select("id")
    ///     .from("users")
    ///     .filter("status", Op::Eq, "active")
    ///     .filter("nickname", Op::Eq, None::<String>) // dropped
    ///     .build();
    /// assert_eq!(q.sql(), "SELECT id FROM users WHERE status = ?");
    /// ```
    pub fn filter(mut self, field: &str, op: Op, value: impl Into<WhereValue>) -> Self {
        self.push_predicate(field, op, value.into());
        self
    }

    /// Add WHERE: field = value
    pub fn eq(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Eq, value)
    }

    /// Add WHERE: field != value
    pub fn ne(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Ne, value)
    }

    /// Add WHERE: field < value
    pub fn lt(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Lt, value)
    }

    /// Add WHERE: field > value
    pub fn gt(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Gt, value)
    }

    /// Add WHERE: field <= value
    pub fn lte(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Lte, value)
    }

    /// Add WHERE: field >= value
    pub fn gte(self, field: &str, value: impl Into<WhereValue>) -> Self {
        self.filter(field, Op::Gte, value)
    }

    /// Add WHERE: field IN(?,?,...)
    pub fn in_list<T: Into<Arg>>(self, field: &str, values: impl IntoIterator<Item = T>) -> Self {
        self.filter(field, Op::In, WhereValue::list(values))
    }

    /// Add WHERE: (a,b) IN((?,?),(?,?),...)
    pub fn in_tuples<T, R>(self, field: &str, rows: impl IntoIterator<Item = R>) -> Self
    where
        T: Into<Arg>,
        R: IntoIterator<Item = T>,
    {
        self.filter(field, Op::In, WhereValue::tuples(rows))
    }

    fn push_predicate(&mut self, field: &str, op: Op, value: WhereValue) {
        match value {
            WhereValue::Scalar(arg) | WhereValue::Optional(Some(arg)) => {
                if !arg.is_empty_text() {
                    self.push_single(field, op, arg);
                }
            }
            WhereValue::Optional(None) => {}
            WhereValue::Opaque(arg) => self.push_single(field, op, arg),
            WhereValue::List(items) => {
                if op != Op::In || items.is_empty() {
                    return;
                }
                self.predicates
                    .push(format!("{} {}({})", field, op, placeholders(items.len())));
                self.args.extend(items);
            }
            WhereValue::Tuples(rows) => {
                if op != Op::In {
                    return;
                }
                let Some(width) = rows.first().map(Vec::len) else {
                    return;
                };
                if width == 0 {
                    return;
                }
                if rows.iter().any(|row| row.len() != width) {
                    tracing::warn!(
                        target: "sqlkit.qb",
                        field,
                        width,
                        "composite IN has groups of differing length; placeholders follow the first group"
                    );
                }
                let group = format!("({})", placeholders(width));
                let groups = vec![group; rows.len()].join(",");
                self.predicates.push(format!("{} {}({})", field, op, groups));
                self.args.extend(rows.into_iter().flatten());
            }
        }
    }

    fn push_single(&mut self, field: &str, op: Op, arg: Arg) {
        self.predicates.push(format!("{} {} ?", field, op));
        self.args.push(arg);
    }

    // ==================== GROUP BY / ORDER BY / LIMIT ====================

    /// Append GROUP BY fields.
    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Append ORDER BY fields (e.g. `"created_at DESC"`).
    pub fn order_by(mut self, fields: &[&str]) -> Self {
        self.order_by.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Set LIMIT. Both tokens are emitted verbatim as `LIMIT <offset>,<limit>`.
    pub fn limit(mut self, limit: impl Display, offset: impl Display) -> Self {
        self.limit = Some(format!("{offset},{limit}"));
        self
    }

    // ==================== Build ====================

    /// Number of arguments collected so far.
    pub fn param_count(&self) -> usize {
        self.args.len()
    }

    /// Render the SQL text only.
    pub fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(64);
        sql.push_str("SELECT ");
        sql.push_str(&self.select_cols.join(", "));
        sql.push_str(" FROM ");
        sql.push_str(&self.from_expr);

        if !self.join_clauses.is_empty() {
            sql.push(' ');
            sql.push_str(&self.join_clauses.join(" "));
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = &self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(limit);
        }
        sql
    }

    /// Compile into SQL text and its arguments.
    pub fn build(&self) -> Query {
        Query::new(self.to_sql(), self.args.clone())
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
