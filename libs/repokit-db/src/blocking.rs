//! Blocking facade over the async adapter.
//!
//! [`BlockingDb`] owns a current-thread tokio runtime and a pool connected on
//! it; every blocking call drives the async operation to completion with
//! `block_on` on the caller's thread. Do not call into this module from
//! inside an async runtime: tokio panics on nested `block_on`.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use repokit_spec::{AsyncCrudRepository, CrudRepository, OrderOptions, PagingOptions, Specification};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait,
    IntoActiveModel, TransactionTrait,
};
use tokio::runtime::Runtime;

use crate::error::{RepoError, RepoResult};
use crate::hooks::{ActiveRecordOf, RecordOf, RepositoryHooks};
use crate::repository::SeaCrudRepository;
use crate::session::SessionProvider;
use crate::tx::TxError;
use crate::{ConnectOpts, DbConfig, DbHandle, Result};

/// Database handle for synchronous callers.
pub struct BlockingDb {
    // Declared before `rt` so the pool is dropped while the runtime is alive.
    handle: DbHandle,
    rt: Arc<Runtime>,
}

impl std::fmt::Debug for BlockingDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingDb")
            .field("handle", &self.handle)
            .field("rt", &"current_thread")
            .finish()
    }
}

impl BlockingDb {
    /// Build a runtime and connect on it.
    ///
    /// # Errors
    /// Runtime construction or connection failures.
    pub fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let handle = rt.block_on(DbHandle::connect(dsn, opts))?;
        Ok(Self {
            handle,
            rt: Arc::new(rt),
        })
    }

    /// # Errors
    /// DSN expansion, runtime construction or connection failures.
    pub fn from_config(cfg: &DbConfig) -> Result<Self> {
        Self::connect(&cfg.resolved_dsn()?, cfg.connect_opts())
    }

    #[must_use]
    pub fn handle(&self) -> &DbHandle {
        &self.handle
    }

    /// Drive an arbitrary future on this handle's runtime (schema setup, raw statements).
    #[must_use]
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }

    /// Blocking repository with one session per operation.
    #[must_use]
    pub fn repository<H>(&self, hooks: H) -> BlockingCrudRepository<H, DbHandle> {
        BlockingCrudRepository {
            rt: Arc::clone(&self.rt),
            inner: SeaCrudRepository::new(hooks, self.handle.clone()),
        }
    }

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    /// Repositories obtained from the [`BlockingTx`] share the transaction.
    ///
    /// # Errors
    /// `TxError::Domain` with the closure's error, `TxError::Infra` when the
    /// transaction cannot be begun, committed or rolled back.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, TxError<E>>
    where
        F: FnOnce(&BlockingTx<'_>) -> std::result::Result<T, E>,
    {
        let txn = self
            .rt
            .block_on(self.handle.sea().begin())
            .map_err(TxError::Infra)?;
        let scope = BlockingTx {
            rt: Arc::clone(&self.rt),
            txn: &txn,
        };
        let outcome = f(&scope);
        drop(scope);
        match outcome {
            Ok(value) => {
                self.rt.block_on(txn.commit()).map_err(TxError::Infra)?;
                Ok(value)
            }
            Err(e) => {
                self.rt.block_on(txn.rollback()).map_err(TxError::Infra)?;
                Err(TxError::Domain(e))
            }
        }
    }
}

/// Open transaction inside [`BlockingDb::transaction`].
pub struct BlockingTx<'a> {
    rt: Arc<Runtime>,
    txn: &'a DatabaseTransaction,
}

impl<'a> BlockingTx<'a> {
    /// Repository whose operations run as savepoints inside this transaction.
    #[must_use]
    pub fn repository<H>(&self, hooks: H) -> BlockingCrudRepository<H, &'a DatabaseTransaction> {
        BlockingCrudRepository {
            rt: Arc::clone(&self.rt),
            inner: SeaCrudRepository::new(hooks, self.txn),
        }
    }
}

/// Synchronous [`CrudRepository`] backed by [`SeaCrudRepository`].
pub struct BlockingCrudRepository<H, S> {
    rt: Arc<Runtime>,
    inner: SeaCrudRepository<H, S>,
}

impl<H, S> BlockingCrudRepository<H, S> {
    /// The async adapter this facade drives.
    #[must_use]
    pub fn as_async(&self) -> &SeaCrudRepository<H, S> {
        &self.inner
    }
}

impl<H, S> CrudRepository for BlockingCrudRepository<H, S>
where
    H: RepositoryHooks,
    S: SessionProvider,
    <H::Entity as EntityTrait>::Column: ColumnTrait + Copy + FromStr,
    RecordOf<H>: IntoActiveModel<ActiveRecordOf<H>> + Clone + Send + Sync,
    ActiveRecordOf<H>: ActiveModelTrait<Entity = H::Entity> + ActiveModelBehavior + Send,
{
    type Model = H::Model;
    type Id = H::Id;
    type CreateForm = H::CreateForm;
    type UpdateForm = H::UpdateForm;
    type Error = RepoError;

    fn get_collection(
        &self,
        spec: Option<&Specification>,
        order: Option<&OrderOptions>,
        paging: Option<PagingOptions>,
    ) -> RepoResult<Vec<H::Model>> {
        self.rt
            .block_on(self.inner.get_collection(spec, order, paging))
    }

    fn count(&self, spec: Option<&Specification>) -> RepoResult<u64> {
        self.rt.block_on(self.inner.count(spec))
    }

    fn get(&self, id: &H::Id) -> RepoResult<H::Model> {
        self.rt.block_on(self.inner.get(id))
    }

    fn exists(&self, id: &H::Id) -> RepoResult<bool> {
        self.rt.block_on(self.inner.exists(id))
    }

    fn create(&self, form: H::CreateForm) -> RepoResult<H::Model> {
        self.rt.block_on(self.inner.create(form))
    }

    fn update(&self, id: &H::Id, form: H::UpdateForm) -> RepoResult<H::Model> {
        self.rt.block_on(self.inner.update(id, form))
    }

    fn delete(&self, id: &H::Id) -> RepoResult<H::Model> {
        self.rt.block_on(self.inner.delete(id))
    }
}
