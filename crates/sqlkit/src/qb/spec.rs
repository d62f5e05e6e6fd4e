//! Record-based statement description, replayed through [`QueryBuilder`].
//!
//! ```yaml
//! select: [u.id, u.name]
//! from: users u
//! joins:
//!   - { kind: left, target: teams t, on: "t.id = u.team_id" }
//! where:
//!   - { field: u.status, op: "=", value: active }
//!   - { field: u.id, op: IN, value: [1, 2, 3] }
//! order_by: ["u.id DESC"]
//! limit: { limit: 20, offset: 0 }
//! ```

use crate::error::{DbError, DbResult};
use crate::qb::clause::{JoinKind, Op};
use crate::qb::select::QueryBuilder;
use crate::qb::value::{Arg, WhereValue};
use serde::Deserialize;
use serde_yaml::Value;

/// A complete SELECT statement in record form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySpec {
    #[serde(default)]
    pub select: Vec<String>,
    pub from: String,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    #[serde(default, rename = "where")]
    pub predicates: Vec<PredicateSpec>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<String>,
    pub limit: Option<LimitSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub target: String,
    pub on: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateSpec {
    pub field: String,
    pub op: Op,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitSpec {
    pub limit: Value,
    #[serde(default = "zero_offset")]
    pub offset: Value,
}

fn zero_offset() -> Value {
    Value::Number(0u64.into())
}

impl QuerySpec {
    /// Parse a spec from YAML text.
    pub fn from_yaml(text: &str) -> DbResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Replay the record through a builder.
    pub fn into_builder(self) -> DbResult<QueryBuilder> {
        let mut qb = QueryBuilder::new().from(&self.from);
        for col in &self.select {
            qb = qb.select(col);
        }
        for join in &self.joins {
            qb = qb.join(join.kind, &join.target, &join.on);
        }
        for pred in self.predicates {
            let value = where_value(&pred.field, pred.value)?;
            qb = qb.filter(&pred.field, pred.op, value);
        }
        let group_by: Vec<&str> = self.group_by.iter().map(String::as_str).collect();
        let order_by: Vec<&str> = self.order_by.iter().map(String::as_str).collect();
        qb = qb.group_by(&group_by).order_by(&order_by);
        if let Some(limit) = self.limit {
            qb = qb.limit(token(&limit.limit)?, token(&limit.offset)?);
        }
        Ok(qb)
    }
}

fn where_value(field: &str, value: Value) -> DbResult<WhereValue> {
    match value {
        Value::Null => Ok(WhereValue::Optional(None)),
        Value::Sequence(items) if !items.is_empty() && items.iter().all(Value::is_sequence) => {
            let rows = items
                .into_iter()
                .map(|row| sequence(field, row))
                .collect::<DbResult<Vec<_>>>()?;
            Ok(WhereValue::Tuples(rows))
        }
        seq @ Value::Sequence(_) => Ok(WhereValue::List(sequence(field, seq)?)),
        other => Ok(WhereValue::Scalar(scalar(field, other)?)),
    }
}

fn sequence(field: &str, value: Value) -> DbResult<Vec<Arg>> {
    match value {
        Value::Sequence(cells) => cells.into_iter().map(|c| scalar(field, c)).collect(),
        other => Err(DbError::config(format!(
            "unsupported value for `{field}`: expected a sequence, got {other:?}"
        ))),
    }
}

fn scalar(field: &str, value: Value) -> DbResult<Arg> {
    match value {
        Value::String(s) => Ok(Arg::Text(s)),
        Value::Bool(b) => Ok(Arg::Bool(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Arg::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Arg::UInt(u))
            } else {
                Ok(Arg::Float(n.as_f64().unwrap_or_default()))
            }
        }
        other => Err(DbError::config(format!(
            "unsupported value for `{field}`: expected a scalar, got {other:?}"
        ))),
    }
}

fn token(value: &Value) -> DbResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DbError::config(format!(
            "limit/offset must be a string or number, got {other:?}"
        ))),
    }
}
