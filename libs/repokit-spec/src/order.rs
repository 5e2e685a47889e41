//! Ordering primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

/// Placement of NULL values relative to the rest of the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullsOrder {
    #[serde(rename = "first")]
    First,
    #[serde(rename = "last")]
    Last,
}

/// One sort key. `nulls: None` leaves NULL placement to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOption {
    pub field: String,
    #[serde(default)]
    pub direction: OrderDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

impl OrderOption {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            nulls: None,
        }
    }

    #[must_use]
    pub fn with_nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// Compound sort key, applied left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use]
pub struct OrderOptions(pub Vec<OrderOption>);

impl OrderOptions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn asc(self, field: impl Into<String>) -> Self {
        self.push(OrderOption::new(field, OrderDirection::Asc))
    }

    pub fn desc(self, field: impl Into<String>) -> Self {
        self.push(OrderOption::new(field, OrderDirection::Desc))
    }

    pub fn push(mut self, option: OrderOption) -> Self {
        self.0.push(option);
        self
    }

    pub fn extend<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = OrderOption>,
    {
        self.0.extend(options);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderOption> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a OrderOptions {
    type Item = &'a OrderOption;
    type IntoIter = std::slice::Iter<'a, OrderOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<OrderOption> for OrderOptions {
    fn from_iter<I: IntoIterator<Item = OrderOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderParseError {
    #[error("empty order expression")]
    Empty,
    #[error("invalid order segment: '{0}'")]
    InvalidSegment(String),
}

/// Parses signed tokens: `"-created_at,+id"`. A missing sign means ascending.
/// A `!` suffix puts NULLs first, a `~` suffix puts them last.
impl FromStr for OrderOptions {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Vec::new();
        for seg in s.split(',') {
            let seg = seg.trim();
            if seg.is_empty() {
                continue;
            }
            let (direction, rest) = if let Some(rest) = seg.strip_prefix('-') {
                (OrderDirection::Desc, rest)
            } else {
                (OrderDirection::Asc, seg.strip_prefix('+').unwrap_or(seg))
            };
            let (field, nulls) = if let Some(f) = rest.strip_suffix('!') {
                (f, Some(NullsOrder::First))
            } else if let Some(f) = rest.strip_suffix('~') {
                (f, Some(NullsOrder::Last))
            } else {
                (rest, None)
            };
            if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(OrderParseError::InvalidSegment(seg.to_owned()));
            }
            out.push(OrderOption {
                field: field.to_owned(),
                direction,
                nulls,
            });
        }
        if out.is_empty() {
            return Err(OrderParseError::Empty);
        }
        Ok(OrderOptions(out))
    }
}

impl fmt::Display for OrderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let dir = match key.direction {
                OrderDirection::Asc => "asc",
                OrderDirection::Desc => "desc",
            };
            write!(f, "{} {dir}", key.field)?;
            match key.nulls {
                Some(NullsOrder::First) => f.write_str(" nulls first")?,
                Some(NullsOrder::Last) => f.write_str(" nulls last")?,
                None => {}
            }
        }
        Ok(())
    }
}
