//! Bindable argument values and the predicate value shapes accepted by `filter`.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// A single positional argument bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Arg {
    /// Empty text is the only "unset" scalar; every other value is present.
    pub(crate) fn is_empty_text(&self) -> bool {
        matches!(self, Arg::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(v) => write!(f, "{v:?}"),
            Arg::Bool(v) => write!(f, "{v}"),
            Arg::Int(v) => write!(f, "{v}"),
            Arg::UInt(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::DateTime(v) => write!(f, "'{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

/// Shape of the right-hand side of a predicate.
///
/// The shape decides whether the predicate is rendered at all and how many
/// placeholders it produces:
///
/// | variant    | rendered when                         | placeholders        |
/// |------------|---------------------------------------|---------------------|
/// | `Scalar`   | value is not empty text               | `?`                 |
/// | `Optional` | `Some` and not empty text             | `?`                 |
/// | `List`     | operator is `IN` and list is non-empty | `(?,?,...)`        |
/// | `Tuples`   | operator is `IN` and list is non-empty | `((?,?),(?,?),...)` |
/// | `Opaque`   | always                                | `?`                 |
#[derive(Debug, Clone, PartialEq)]
pub enum WhereValue {
    Scalar(Arg),
    Optional(Option<Arg>),
    List(Vec<Arg>),
    Tuples(Vec<Vec<Arg>>),
    Opaque(Arg),
}

impl WhereValue {
    /// Build a list value from any iterator of argument-like values.
    pub fn list<T: Into<Arg>>(values: impl IntoIterator<Item = T>) -> Self {
        WhereValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Build a composite (tuple) value from nested iterators.
    pub fn tuples<T, R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        T: Into<Arg>,
        R: IntoIterator<Item = T>,
    {
        WhereValue::Tuples(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Pass a value through verbatim, skipping the emptiness check.
    pub fn opaque(value: impl Into<Arg>) -> Self {
        WhereValue::Opaque(value.into())
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::$variant(v.into())
                }
            }

            impl From<$ty> for WhereValue {
                fn from(v: $ty) -> Self {
                    WhereValue::Scalar(Arg::from(v))
                }
            }

            impl From<Option<$ty>> for WhereValue {
                fn from(v: Option<$ty>) -> Self {
                    WhereValue::Optional(v.map(Arg::from))
                }
            }

            impl From<Vec<$ty>> for WhereValue {
                fn from(v: Vec<$ty>) -> Self {
                    WhereValue::list(v)
                }
            }

            impl From<Vec<Vec<$ty>>> for WhereValue {
                fn from(v: Vec<Vec<$ty>>) -> Self {
                    WhereValue::tuples(v)
                }
            }
        )*
    };
}

impl_arg_from! {
    &str => Text,
    String => Text,
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    NaiveDateTime => DateTime,
}

impl From<&String> for Arg {
    fn from(v: &String) -> Self {
        Arg::Text(v.clone())
    }
}

impl From<&String> for WhereValue {
    fn from(v: &String) -> Self {
        WhereValue::Scalar(Arg::from(v))
    }
}

impl From<Option<&String>> for WhereValue {
    fn from(v: Option<&String>) -> Self {
        WhereValue::Optional(v.map(Arg::from))
    }
}

impl From<&[&str]> for WhereValue {
    fn from(v: &[&str]) -> Self {
        WhereValue::list(v.iter().copied())
    }
}

impl From<Arg> for WhereValue {
    fn from(v: Arg) -> Self {
        WhereValue::Scalar(v)
    }
}

impl From<Option<Arg>> for WhereValue {
    fn from(v: Option<Arg>) -> Self {
        WhereValue::Optional(v)
    }
}
