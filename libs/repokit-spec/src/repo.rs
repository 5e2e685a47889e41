//! Repository contracts.
//!
//! [`AsyncCrudRepository`] and [`CrudRepository`] share one contract; the async
//! form suspends at storage I/O and returns the same results.

use async_trait::async_trait;

use crate::{OrderOptions, PagingOptions, Specification};

/// Asynchronous CRUD repository over one kind of domain model.
#[async_trait]
pub trait AsyncCrudRepository: Send + Sync {
    type Model: Send;
    type Id: Send + Sync;
    type CreateForm: Send;
    type UpdateForm: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Models matching `spec` (all when `None`), ordered by `order` (or the
    /// repository default) and windowed by `paging`.
    ///
    /// # Errors
    /// Backend errors, or an invalid `spec`/`order`.
    async fn get_collection(
        &self,
        spec: Option<&Specification>,
        order: Option<&OrderOptions>,
        paging: Option<PagingOptions>,
    ) -> Result<Vec<Self::Model>, Self::Error>;

    /// Number of models matching `spec`.
    ///
    /// # Errors
    /// Backend errors, or an invalid `spec`.
    async fn count(&self, spec: Option<&Specification>) -> Result<u64, Self::Error>;

    /// Model with the given id.
    ///
    /// # Errors
    /// Not-found when no model has `id`.
    async fn get(&self, id: &Self::Id) -> Result<Self::Model, Self::Error>;

    /// # Errors
    /// Backend errors only.
    async fn exists(&self, id: &Self::Id) -> Result<bool, Self::Error>;

    /// Persist a new model and return it with its assigned id.
    ///
    /// # Errors
    /// Constraint violations or backend errors.
    async fn create(&self, form: Self::CreateForm) -> Result<Self::Model, Self::Error>;

    /// Apply the fields present in `form`; absent fields are left unchanged.
    ///
    /// # Errors
    /// Not-found, constraint violations or backend errors.
    async fn update(&self, id: &Self::Id, form: Self::UpdateForm)
    -> Result<Self::Model, Self::Error>;

    /// Remove the model and return it as it was before removal.
    ///
    /// # Errors
    /// Not-found, constraint violations or backend errors.
    async fn delete(&self, id: &Self::Id) -> Result<Self::Model, Self::Error>;
}

/// Blocking CRUD repository. Same contract as [`AsyncCrudRepository`].
pub trait CrudRepository {
    type Model;
    type Id;
    type CreateForm;
    type UpdateForm;
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    /// Backend errors, or an invalid `spec`/`order`.
    fn get_collection(
        &self,
        spec: Option<&Specification>,
        order: Option<&OrderOptions>,
        paging: Option<PagingOptions>,
    ) -> Result<Vec<Self::Model>, Self::Error>;

    /// # Errors
    /// Backend errors, or an invalid `spec`.
    fn count(&self, spec: Option<&Specification>) -> Result<u64, Self::Error>;

    /// # Errors
    /// Not-found when no model has `id`.
    fn get(&self, id: &Self::Id) -> Result<Self::Model, Self::Error>;

    /// # Errors
    /// Backend errors only.
    fn exists(&self, id: &Self::Id) -> Result<bool, Self::Error>;

    /// # Errors
    /// Constraint violations or backend errors.
    fn create(&self, form: Self::CreateForm) -> Result<Self::Model, Self::Error>;

    /// # Errors
    /// Not-found, constraint violations or backend errors.
    fn update(&self, id: &Self::Id, form: Self::UpdateForm) -> Result<Self::Model, Self::Error>;

    /// # Errors
    /// Not-found, constraint violations or backend errors.
    fn delete(&self, id: &Self::Id) -> Result<Self::Model, Self::Error>;
}
