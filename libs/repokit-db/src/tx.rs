//! Transaction scope spanning several repository calls.
//!
//! Each repository operation normally runs in its own session. To make a group
//! of operations atomic, run them inside [`run_in_transaction`] (or
//! [`DbHandle::transaction`](crate::DbHandle::transaction)) and build the
//! repositories over the transaction handed to the closure.
//!
//! ```rust,ignore
//! let moved = db.transaction(|tx| Box::pin(async move {
//!     let users = SeaCrudRepository::new(UserHooks, tx);
//!     users.update(&from, debit).await?;
//!     users.update(&to, credit).await
//! })).await.map_err(|e| e.into_domain(RepoError::Db))?;
//! ```

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, DbErr, TransactionTrait};
use thiserror::Error;

/// Boxed future returned by a transaction closure.
pub type TxFuture<'c, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>;

/// Failure of a transaction scope.
#[derive(Debug, Error)]
pub enum TxError<E> {
    /// The closure returned an error; the transaction was rolled back.
    #[error("{0}")]
    Domain(E),
    /// Beginning, committing or rolling back failed.
    #[error("infrastructure error: {0}")]
    Infra(#[source] DbErr),
}

impl<E> TxError<E> {
    /// Collapse into the domain error type, mapping infrastructure failures
    /// with `map_infra`.
    #[must_use]
    pub fn into_domain<F>(self, map_infra: F) -> E
    where
        F: FnOnce(DbErr) -> E,
    {
        match self {
            TxError::Domain(e) => e,
            TxError::Infra(err) => map_infra(err),
        }
    }
}

/// Run `f` inside a transaction begun on `conn`. Commits on `Ok`, rolls back
/// on `Err`. On a `DatabaseTransaction` this opens a savepoint.
///
/// # Errors
/// `TxError::Domain` with the closure's error, or `TxError::Infra` when the
/// transaction cannot be begun, committed or rolled back.
pub async fn run_in_transaction<C, T, E, F>(conn: &C, f: F) -> Result<T, TxError<E>>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T, E> + Send,
    T: Send,
    E: Send,
{
    let txn = conn.begin().await.map_err(TxError::Infra)?;
    let outcome = f(&txn).await;
    match outcome {
        Ok(value) => {
            txn.commit().await.map_err(TxError::Infra)?;
            Ok(value)
        }
        Err(e) => {
            tracing::debug!("transaction closure failed, rolling back");
            txn.rollback().await.map_err(TxError::Infra)?;
            Err(TxError::Domain(e))
        }
    }
}
