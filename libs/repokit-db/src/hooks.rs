//! Integration hooks for [`SeaCrudRepository`](crate::SeaCrudRepository).

use std::fmt;

use sea_orm::{EntityTrait, Select};

/// Stored record type of a hooks implementation.
pub type RecordOf<H> = <<H as RepositoryHooks>::Entity as EntityTrait>::Model;

/// Mutable record type of a hooks implementation.
pub type ActiveRecordOf<H> = <<H as RepositoryHooks>::Entity as EntityTrait>::ActiveModel;

/// Capabilities a concrete integration supplies to the CRUD adapter.
///
/// The adapter owns control flow (sessions, query order, error mapping);
/// the hooks own everything entity-specific. Only the identity filter, the
/// conversions and the form handling are mandatory.
///
/// ```rust,ignore
/// struct NewsHooks;
///
/// impl RepositoryHooks for NewsHooks {
///     type Entity = news::Entity;
///     type Model = News;
///     type Id = i32;
///     type CreateForm = NewsCreate;
///     type UpdateForm = NewsUpdate;
///
///     fn filter_by_id(&self, select: Select<news::Entity>, id: &i32) -> Select<news::Entity> {
///         select.filter(news::Column::Id.eq(*id))
///     }
///     // ...
/// }
/// ```
pub trait RepositoryHooks: Send + Sync {
    /// Entity backing the repository.
    type Entity: EntityTrait;
    /// Domain model handed to callers.
    type Model: Send;
    type Id: fmt::Display + Send + Sync;
    type CreateForm: Send;
    /// Partial update. Absent fields must leave the record unchanged.
    type UpdateForm: Send;

    /// Name used in error messages. Defaults to the domain model's type name.
    #[must_use]
    fn model_name(&self) -> &'static str {
        let full = std::any::type_name::<Self::Model>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Restrict `select` to the record with `id`.
    fn filter_by_id(&self, select: Select<Self::Entity>, id: &Self::Id) -> Select<Self::Entity>;

    /// Filter applied to every query, identity lookups included.
    fn default_filter(&self, select: Select<Self::Entity>) -> Select<Self::Entity> {
        select
    }

    /// Ordering used when the caller supplies none.
    fn default_order(&self, select: Select<Self::Entity>) -> Select<Self::Entity> {
        select
    }

    fn to_domain(&self, record: RecordOf<Self>) -> Self::Model;

    /// Build the record to insert.
    fn new_record(&self, form: Self::CreateForm) -> ActiveRecordOf<Self>;

    /// Set the fields present in `form` on `record`.
    fn apply_update(&self, record: &mut ActiveRecordOf<Self>, form: Self::UpdateForm);
}
