//! Specification predicate trees.
//!
//! A [`Specification`] is built by the caller and handed to a repository by
//! reference. Backends translate the whole tree before querying; nothing here
//! is evaluated in memory.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Comparison applied by an attribute predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// SQL `LIKE`; the pattern is used verbatim (the caller places `%`/`_`).
    Like,
    /// Case-insensitive `LIKE`.
    ILike,
    /// Membership in a [`Value::List`].
    In,
    /// Non-membership in a [`Value::List`].
    NotIn,
}

impl Operator {
    /// Operators that only accept a [`Value::List`] operand.
    #[must_use]
    pub fn expects_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "like",
            Operator::ILike => "ilike",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal operand of an attribute predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Date(d) => write!(f, "{d}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Immutable predicate tree over the attributes of a stored record.
#[derive(Clone, Debug, PartialEq)]
pub enum Specification {
    /// `name <op> value`
    Attribute {
        name: String,
        op: Operator,
        value: Value,
    },
    And(Box<Specification>, Box<Specification>),
    Or(Box<Specification>, Box<Specification>),
    Not(Box<Specification>),
}

impl Specification {
    /// Equality test: `name = value` (`IS NULL` for [`Value::Null`]).
    #[must_use]
    pub fn attr(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr_op(name, Operator::Eq, value)
    }

    /// Attribute predicate with an explicit operator.
    #[must_use]
    pub fn attr_op(name: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Specification::Attribute {
            name: name.into(),
            op,
            value: value.into(),
        }
    }

    /// Combine with AND: `self and other`
    #[must_use]
    pub fn and(self, other: Specification) -> Specification {
        Specification::And(Box::new(self), Box::new(other))
    }

    /// Combine with OR: `self or other`
    #[must_use]
    pub fn or(self, other: Specification) -> Specification {
        Specification::Or(Box::new(self), Box::new(other))
    }

    /// Negate: `not self`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Specification {
        !self
    }

    /// Fold into a left-nested conjunction. `None` for an empty iterator.
    #[must_use]
    pub fn all_of<I>(specs: I) -> Option<Specification>
    where
        I: IntoIterator<Item = Specification>,
    {
        specs.into_iter().reduce(Specification::and)
    }

    /// Fold into a left-nested disjunction. `None` for an empty iterator.
    #[must_use]
    pub fn any_of<I>(specs: I) -> Option<Specification>
    where
        I: IntoIterator<Item = Specification>,
    {
        specs.into_iter().reduce(Specification::or)
    }
}

impl std::ops::Not for Specification {
    type Output = Specification;

    fn not(self) -> Self::Output {
        Specification::Not(Box::new(self))
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specification::Attribute { name, op, value } => write!(f, "{name} {op} {value}"),
            Specification::And(l, r) => write!(f, "({l} and {r})"),
            Specification::Or(l, r) => write!(f, "({l} or {r})"),
            Specification::Not(inner) => write!(f, "not ({inner})"),
        }
    }
}
