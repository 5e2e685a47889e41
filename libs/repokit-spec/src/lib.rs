#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `RepoKit` repository vocabulary.
//!
//! Storage-agnostic building blocks shared by every repository backend:
//!
//! - [`Specification`]: an immutable predicate tree (`attribute`, `and`, `or`, `not`)
//! - [`OrderOptions`]: a compound sort key applied left to right
//! - [`PagingOptions`] and [`PageResolver`]: limit/offset windows
//! - [`CrudRepository`] and [`AsyncCrudRepository`]: the repository contract
//!
//! Backends (for example `repokit-db` for `SeaORM`) translate these values into
//! native queries; nothing in this crate touches storage.
//!
//! # Example
//! ```rust
//! use repokit_spec::{OrderOptions, PagingOptions, Specification};
//!
//! let spec = Specification::attr("status", "active")
//!     .and(!Specification::attr("username", "root"));
//! let order = OrderOptions::new().desc("created_at").asc("id");
//! let paging = PagingOptions::new(Some(20), Some(40));
//!
//! assert_eq!(order.len(), 2);
//! assert_eq!(paging.limit, Some(20));
//! assert_eq!(spec.to_string(), "(status = 'active' and not (username = 'root'))");
//! ```

pub mod order;
pub mod paging;
pub mod repo;
pub mod spec;

pub use order::{NullsOrder, OrderDirection, OrderOption, OrderOptions, OrderParseError};
pub use paging::{PageResolver, PagingOptions};
pub use repo::{AsyncCrudRepository, CrudRepository};
pub use spec::{Operator, Specification, Value};
