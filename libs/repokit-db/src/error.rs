//! Repository error taxonomy.
//!
//! Identity lookups that miss, constraint violations and invalid
//! specifications get their own variants; every other `DbErr` passes through
//! untouched in [`RepoError::Db`].

use std::fmt;

use repokit_spec::Operator;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Write operation that hit a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepoAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for RepoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepoAction::Create => "create",
            RepoAction::Update => "update",
            RepoAction::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Item of type {model} not found (id: {id})")]
    NotFound { model: &'static str, id: String },

    #[error("Action {action} of {model} instance failed due to unique violation")]
    UniqueViolation {
        model: &'static str,
        action: RepoAction,
    },

    #[error("Action {action} of {model} instance failed due to relation violation")]
    RelationViolation {
        model: &'static str,
        action: RepoAction,
    },

    #[error("Unknown attribute '{attribute}' on {entity}")]
    UnknownAttribute { attribute: String, entity: String },

    #[error("Invalid value for '{attribute}' with operator {op}: {reason}")]
    InvalidValue {
        attribute: String,
        op: Operator,
        reason: String,
    },

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl RepoError {
    pub(crate) fn not_found(model: &'static str, id: &impl fmt::Display) -> Self {
        RepoError::NotFound {
            model,
            id: id.to_string(),
        }
    }

    /// Map a failed write to the taxonomy. Constraint violations become
    /// `UniqueViolation`/`RelationViolation`; anything else stays `Db`.
    pub(crate) fn from_write(err: DbErr, model: &'static str, action: RepoAction) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!(model, %action, %detail, "unique constraint violated");
                RepoError::UniqueViolation { model, action }
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::warn!(model, %action, %detail, "foreign key constraint violated");
                RepoError::RelationViolation { model, action }
            }
            _ => RepoError::Db(err),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }

    /// `true` for unique and relation violations.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            RepoError::UniqueViolation { .. } | RepoError::RelationViolation { .. }
        )
    }
}
