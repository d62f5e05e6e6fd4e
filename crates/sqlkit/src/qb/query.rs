//! Compiled statement.

use crate::qb::value::Arg;
use std::fmt;

/// A compiled statement: SQL text with `?` placeholders and the arguments
/// that fill them, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    args: Vec<Arg>,
}

impl Query {
    pub(crate) fn new(sql: String, args: Vec<Arg>) -> Self {
        Self { sql, args }
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The positional arguments.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Split into owned text and arguments.
    pub fn into_parts(self) -> (String, Vec<Arg>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
