//! Parameterized SELECT builder for MySQL-style `?` placeholders.
//!
//! # Features
//!
//! - **Shape-directed predicates**: unset optional filters are dropped, lists expand
//!   into `IN(?,?,...)`, tuples into `IN((?,?),(?,?))`
//! - **Aligned arguments**: the Nth `?` in the compiled text consumes the Nth argument
//! - **Fixed clause order**: call order does not change the rendered SQL
//! - **Record form**: [`QuerySpec`] describes the same statement as data
//!
//! # Usage
//!
//! ```ignore
//! use sqlkit::qb::{self, Op};
//!
//! let query = qb::select(&["u.id", "u.name"])
//!     .from("users u")
//!     .left_join("teams t", "t.id = u.team_id")
//!     .filter("u.status", Op::Eq, "active")
//!     .filter("u.nickname", Op::Eq, params.nickname) // Option<String>, dropped when None
//!     .in_list("u.role", ["admin", "owner"])
//!     .order_by(&["u.id DESC"])
//!     .limit(20, 0)
//!     .build();
//!
//! conn.exec(query.sql(), query.args()).await?;
//! ```

mod clause;
mod query;
mod select;
mod spec;
mod value;

pub use clause::{JoinKind, Op};
pub use query::Query;
pub use select::QueryBuilder;
pub use spec::{JoinSpec, LimitSpec, PredicateSpec, QuerySpec};
pub use value::{Arg, WhereValue};

/// Create a builder with the given SELECT columns.
///
/// # Example
/// ```ignore
/// let qb = sqlkit::qb::select(&["id", "name"]).from("users");
/// ```
pub fn select(cols: &[&str]) -> QueryBuilder {
    QueryBuilder::new().select_cols(cols)
}
