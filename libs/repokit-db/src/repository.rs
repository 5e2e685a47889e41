//! CRUD repository adapter over `SeaORM`.
//!
//! Every operation opens one session from the [`SessionProvider`], runs its
//! statements inside it and commits. Errors drop the session, which rolls it
//! back. Queries are built as:
//!
//! `find()` → default filter → specification → order (caller's, else the
//! default order) → limit/offset.
//!
//! Identity lookups (`get`, `exists`, `update`, `delete`) use `find()` →
//! default filter → id filter and never translate a specification.

use std::str::FromStr;

use async_trait::async_trait;
use repokit_spec::{AsyncCrudRepository, OrderOptions, PagingOptions, Specification};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, Select,
};

use crate::error::{RepoAction, RepoError, RepoResult};
use crate::hooks::{ActiveRecordOf, RecordOf, RepositoryHooks};
use crate::query::SpecificationQueryExt;
use crate::session::SessionProvider;

/// Repository adapter: generic CRUD control flow around integration hooks.
#[derive(Debug, Clone)]
pub struct SeaCrudRepository<H, S> {
    hooks: H,
    sessions: S,
}

impl<H, S> SeaCrudRepository<H, S> {
    #[must_use]
    pub fn new(hooks: H, sessions: S) -> Self {
        Self { hooks, sessions }
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[must_use]
    pub fn sessions(&self) -> &S {
        &self.sessions
    }
}

impl<H, S> SeaCrudRepository<H, S>
where
    H: RepositoryHooks,
    <H::Entity as EntityTrait>::Column: ColumnTrait + Copy + FromStr,
{
    fn base_query(&self) -> Select<H::Entity> {
        self.hooks.default_filter(H::Entity::find())
    }

    /// Identity lookup query: default filter plus the id filter.
    #[must_use]
    pub fn id_query(&self, id: &H::Id) -> Select<H::Entity> {
        self.hooks.filter_by_id(self.base_query(), id)
    }

    /// Collection query for `get_collection`.
    ///
    /// # Errors
    /// Translation errors for `spec` or `order`.
    pub fn collection_query(
        &self,
        spec: Option<&Specification>,
        order: Option<&OrderOptions>,
        paging: Option<PagingOptions>,
    ) -> RepoResult<Select<H::Entity>> {
        let mut query = self.count_query(spec)?;
        query = match order {
            Some(order) => query.apply_order_options(order)?,
            None => self.hooks.default_order(query),
        };
        Ok(match paging {
            Some(paging) => query.apply_paging(paging),
            None => query,
        })
    }

    /// Filter-only query for `count`.
    ///
    /// # Errors
    /// Translation errors for `spec`.
    pub fn count_query(&self, spec: Option<&Specification>) -> RepoResult<Select<H::Entity>> {
        let query = self.base_query();
        match spec {
            Some(spec) => query.apply_specification(spec),
            None => Ok(query),
        }
    }
}

#[async_trait]
impl<H, S> AsyncCrudRepository for SeaCrudRepository<H, S>
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

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name()))]
    async fn get_collection(
        &self,
        spec: Option<&Specification>,
        order: Option<&OrderOptions>,
        paging: Option<PagingOptions>,
    ) -> RepoResult<Vec<H::Model>> {
        let query = self.collection_query(spec, order, paging)?;
        let txn = self.sessions.open_session().await?;
        let records = query.all(&txn).await?;
        txn.commit().await?;
        tracing::debug!(rows = records.len(), "collection fetched");
        Ok(records
            .into_iter()
            .map(|record| self.hooks.to_domain(record))
            .collect())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name()))]
    async fn count(&self, spec: Option<&Specification>) -> RepoResult<u64> {
        let query = self.count_query(spec)?;
        let txn = self.sessions.open_session().await?;
        let n = query.count(&txn).await?;
        txn.commit().await?;
        Ok(n)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name(), id = %id))]
    async fn get(&self, id: &H::Id) -> RepoResult<H::Model> {
        let model = self.hooks.model_name();
        let txn = self.sessions.open_session().await?;
        let record = self
            .id_query(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::not_found(model, id))?;
        txn.commit().await?;
        Ok(self.hooks.to_domain(record))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name(), id = %id))]
    async fn exists(&self, id: &H::Id) -> RepoResult<bool> {
        let txn = self.sessions.open_session().await?;
        let n = self.id_query(id).count(&txn).await?;
        txn.commit().await?;
        Ok(n > 0)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name()))]
    async fn create(&self, form: H::CreateForm) -> RepoResult<H::Model> {
        let model = self.hooks.model_name();
        let write_err = |e: DbErr| RepoError::from_write(e, model, RepoAction::Create);

        let active = self.hooks.new_record(form);
        let txn = self.sessions.open_session().await?;
        let record = active.insert(&txn).await.map_err(write_err)?;
        txn.commit().await.map_err(write_err)?;
        Ok(self.hooks.to_domain(record))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name(), id = %id))]
    async fn update(&self, id: &H::Id, form: H::UpdateForm) -> RepoResult<H::Model> {
        let model = self.hooks.model_name();
        let write_err = |e: DbErr| RepoError::from_write(e, model, RepoAction::Update);

        let txn = self.sessions.open_session().await?;
        let record = self
            .id_query(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::not_found(model, id))?;

        let mut active = record.clone().into_active_model();
        self.hooks.apply_update(&mut active, form);

        let record = if active.is_changed() {
            active.update(&txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::not_found(model, id),
                e => write_err(e),
            })?
        } else {
            tracing::debug!("update form carries no changes");
            record
        };
        txn.commit().await.map_err(write_err)?;
        Ok(self.hooks.to_domain(record))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(model = self.hooks.model_name(), id = %id))]
    async fn delete(&self, id: &H::Id) -> RepoResult<H::Model> {
        let model = self.hooks.model_name();
        let write_err = |e: DbErr| RepoError::from_write(e, model, RepoAction::Delete);

        let txn = self.sessions.open_session().await?;
        let record = self
            .id_query(id)
            .one(&txn)
            .await?
            .ok_or_else(|| RepoError::not_found(model, id))?;
        H::Entity::delete(record.clone().into_active_model())
            .exec(&txn)
            .await
            .map_err(write_err)?;
        txn.commit().await.map_err(write_err)?;
        Ok(self.hooks.to_domain(record))
    }
}
