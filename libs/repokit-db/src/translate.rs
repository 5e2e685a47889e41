//! Specification to `SeaORM` condition translation.
//!
//! Attribute names resolve against the entity's `Column` enum through its
//! `FromStr` impl, so they are the snake-case column names generated by
//! `DeriveEntityModel`. The whole tree is translated up front; the first
//! unknown attribute or operator/value mismatch aborts with an error.

use std::str::FromStr;

use repokit_spec::{Operator, Specification, Value};
use sea_orm::sea_query::{BinOper, Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait};

use crate::error::{RepoError, RepoResult};

/// Resolve an attribute name to a column of `E`.
///
/// # Errors
/// `RepoError::UnknownAttribute` when `E` has no such column.
pub fn resolve_column<E>(name: &str) -> RepoResult<E::Column>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    E::Column::from_str(name).map_err(|_| RepoError::UnknownAttribute {
        attribute: name.to_owned(),
        entity: E::default().table_name().to_owned(),
    })
}

/// Translate a specification into a condition over `E`.
///
/// # Errors
/// - `RepoError::UnknownAttribute` for a name that is not a column of `E`
/// - `RepoError::InvalidValue` for an operand the operator cannot take
pub fn spec_to_condition<E>(spec: &Specification) -> RepoResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy + FromStr,
{
    match spec {
        Specification::Attribute { name, op, value } => {
            let col = resolve_column::<E>(name)?;
            Ok(Condition::all().add(attribute_expr(col, name, *op, value)?))
        }
        Specification::And(l, r) => Ok(Condition::all()
            .add(spec_to_condition::<E>(l)?)
            .add(spec_to_condition::<E>(r)?)),
        Specification::Or(l, r) => Ok(Condition::any()
            .add(spec_to_condition::<E>(l)?)
            .add(spec_to_condition::<E>(r)?)),
        Specification::Not(inner) => Ok(Condition::all()
            .add(spec_to_condition::<E>(inner)?)
            .not()),
    }
}

/* ---------- attribute predicates ---------- */

fn attribute_expr<C: ColumnTrait>(
    col: C,
    name: &str,
    op: Operator,
    value: &Value,
) -> RepoResult<SimpleExpr> {
    let target = Expr::col((col.entity_name(), col));
    let invalid = |reason: String| RepoError::InvalidValue {
        attribute: name.to_owned(),
        op,
        reason,
    };
    let operand =
        |v: &Value| scalar(v).ok_or_else(|| invalid(format!("unsupported operand {}", v.kind())));

    match (op, value) {
        (Operator::Eq, Value::Null) => Ok(target.is_null()),
        (Operator::Ne, Value::Null) => Ok(target.is_not_null()),
        (_, Value::Null) => Err(invalid("null is only comparable with = and !=".to_owned())),

        (Operator::In | Operator::NotIn, Value::List(items)) => {
            if items.is_empty() {
                // Empty IN matches nothing, empty NOT IN matches everything.
                return Ok(Expr::cust(if op == Operator::In { "1=0" } else { "1=1" }));
            }
            let values = items
                .iter()
                .map(|v| scalar(v).ok_or_else(|| invalid(format!("list item of kind {}", v.kind()))))
                .collect::<RepoResult<Vec<_>>>()?;
            Ok(if op == Operator::In {
                target.is_in(values)
            } else {
                target.is_not_in(values)
            })
        }
        (Operator::In | Operator::NotIn, other) => {
            Err(invalid(format!("expected a list, got {}", other.kind())))
        }
        (_, Value::List(_)) => Err(invalid("lists are only accepted by in / not in".to_owned())),

        (Operator::Like, Value::String(pattern)) => Ok(target.like(pattern.as_str())),
        // Both sides go through the backend's LOWER so they fold identically.
        (Operator::ILike, Value::String(pattern)) => Ok(Expr::expr(Func::lower(target)).binary(
            BinOper::Like,
            Func::lower(Expr::val(pattern.as_str())),
        )),
        (Operator::Like | Operator::ILike, other) => {
            Err(invalid(format!("expected a string pattern, got {}", other.kind())))
        }

        (Operator::Eq, v) => Ok(target.eq(operand(v)?)),
        (Operator::Ne, v) => Ok(target.ne(operand(v)?)),
        (Operator::Gt, v) => Ok(target.gt(operand(v)?)),
        (Operator::Gte, v) => Ok(target.gte(operand(v)?)),
        (Operator::Lt, v) => Ok(target.lt(operand(v)?)),
        (Operator::Lte, v) => Ok(target.lte(operand(v)?)),
    }
}

/// Scalar operand as a bind value. `None` for `Null` and nested lists.
fn scalar(value: &Value) -> Option<sea_orm::Value> {
    Some(match value {
        Value::Bool(b) => (*b).into(),
        Value::Int(i) => (*i).into(),
        Value::Float(x) => (*x).into(),
        Value::String(s) => s.clone().into(),
        Value::Uuid(u) => (*u).into(),
        Value::DateTime(dt) => (*dt).into(),
        Value::Date(d) => (*d).into(),
        Value::Null | Value::List(_) => return None,
    })
}
