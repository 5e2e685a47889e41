//! Scoped sessions.
//!
//! A session is a `DatabaseTransaction` owned by one repository operation.
//! The operation commits it on success; dropping it on any other path rolls
//! it back.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::DbHandle;

/// Factory for per-operation sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a session for one repository operation.
    ///
    /// # Errors
    /// Returns the driver error when no connection can be acquired.
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr>;
}

#[async_trait]
impl SessionProvider for DatabaseConnection {
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr> {
        self.begin().await
    }
}

/// Sessions opened inside a running transaction are savepoints.
#[async_trait]
impl SessionProvider for DatabaseTransaction {
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr> {
        self.begin().await
    }
}

#[async_trait]
impl SessionProvider for DbHandle {
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr> {
        self.sea().begin().await
    }
}

#[async_trait]
impl<S: SessionProvider + ?Sized> SessionProvider for &S {
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr> {
        (**self).open_session().await
    }
}

#[async_trait]
impl<S: SessionProvider + ?Sized> SessionProvider for Arc<S> {
    async fn open_session(&self) -> Result<DatabaseTransaction, DbErr> {
        (**self).open_session().await
    }
}
