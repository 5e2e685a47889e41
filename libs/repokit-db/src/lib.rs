#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `RepoKit` `SeaORM` backend.
//!
//! Implements the repository contracts of `repokit-spec` on top of `SeaORM`:
//!
//! - [`translate`]: specification trees to `SeaORM` [`Condition`](sea_orm::Condition)s
//! - [`query`]: applying specifications, order options and paging to a `Select`
//! - [`repository`]: the CRUD adapter driven by [`RepositoryHooks`]
//! - [`blocking`]: a blocking facade over the async adapter
//! - [`tx`]: an explicit transaction scope spanning several repository calls
//!
//! Connection handling ([`DbHandle`], [`ConnectOpts`]) and configuration
//! ([`config::DbConfig`]) live here as well.
//!
//! # Features
//! - `sqlite` (default), `pg`, `mysql`: enable `SQLx` backends
//!
//! # Example
//! ```rust,no_run
//! use repokit_db::{ConnectOpts, DbHandle, SeaCrudRepository};
//! # async fn demo<H: repokit_db::RepositoryHooks>(hooks: H) -> repokit_db::Result<()> {
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let repo = SeaCrudRepository::new(hooks, db.clone());
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(any(feature = "pg", feature = "mysql", feature = "sqlite")),
    allow(unused_imports, unused_variables, dead_code, unreachable_code)
)]

pub mod blocking;
pub mod config;
pub mod error;
pub mod hooks;
pub mod query;
pub mod repository;
pub mod session;
pub mod translate;
pub mod tx;

mod pool_opts;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use blocking::{BlockingCrudRepository, BlockingDb, BlockingTx};
pub use config::{DbConfig, PoolCfg};
pub use error::{RepoAction, RepoError, RepoResult};
pub use hooks::RepositoryHooks;
pub use query::SpecificationQueryExt;
pub use repository::SeaCrudRepository;
pub use session::SessionProvider;
pub use translate::spec_to_condition;
pub use tx::{TxError, TxFuture, run_in_transaction};

use std::time::Duration;

#[cfg(any(feature = "pg", feature = "mysql", feature = "sqlite"))]
use pool_opts::ApplyPoolOpts;

use sea_orm::{DatabaseConnection, DatabaseTransaction};
use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Connection and configuration errors.
///
/// Repository operations report [`RepoError`] instead.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error(transparent)]
    Config(#[from] Box<figment::Error>),

    #[cfg(any(feature = "pg", feature = "mysql", feature = "sqlite"))]
    #[error(transparent)]
    Sqlx(#[from] sea_orm::sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    MySql,
    Sqlite,
}

/// Pool options; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime for a connection.
    pub max_lifetime: Option<Duration>,
    /// Test connection health before acquire.
    pub test_before_acquire: bool,
    /// For `SQLite` file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            max_lifetime: None,
            test_before_acquire: false,
            create_sqlite_dirs: true,
        }
    }
}

/// Pooled connection to one database.
///
/// Cloning is cheap: clones share the pool.
#[derive(Debug, Clone)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Detect engine by DSN scheme.
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` if the DSN scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("mysql://") {
            Ok(DbEngine::MySql)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(redact_credentials_in_dsn(dsn)))
        }
    }

    /// Connect and build handle.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid, the backend feature is
    /// disabled, or the pool cannot connect.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        tracing::debug!(
            dsn = %redact_credentials_in_dsn(dsn),
            engine = ?engine,
            "Building database connection"
        );
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let pool = sea_orm::sqlx::postgres::PgPoolOptions::new()
                    .apply(&opts)
                    .connect(dsn)
                    .await?;
                Ok(Self {
                    engine,
                    dsn: dsn.to_owned(),
                    sea: sea_orm::SqlxPostgresConnector::from_sqlx_postgres_pool(pool),
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(feature = "mysql")]
            DbEngine::MySql => {
                let pool = sea_orm::sqlx::mysql::MySqlPoolOptions::new()
                    .apply(&opts)
                    .connect(dsn)
                    .await?;
                Ok(Self {
                    engine,
                    dsn: dsn.to_owned(),
                    sea: sea_orm::SqlxMySqlConnector::from_sqlx_mysql_pool(pool),
                })
            }
            #[cfg(not(feature = "mysql"))]
            DbEngine::MySql => Err(DbError::FeatureDisabled("MySQL feature not enabled")),
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                let dsn = sqlite::prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
                let pool = sea_orm::sqlx::sqlite::SqlitePoolOptions::new()
                    .apply(&opts)
                    .connect(&dsn)
                    .await?;
                Ok(Self {
                    engine,
                    dsn,
                    sea: sea_orm::SqlxSqliteConnector::from_sqlx_sqlite_pool(pool),
                })
            }
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// DSN with credentials redacted.
    #[must_use]
    pub fn dsn(&self) -> String {
        redact_credentials_in_dsn(&self.dsn)
    }

    /// The `SeaORM` connection backing this handle.
    #[must_use]
    pub fn sea(&self) -> &DatabaseConnection {
        &self.sea
    }

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// Repositories built over the `&DatabaseTransaction` handed to `f` open
    /// savepoints inside it, so several repository calls become atomic.
    ///
    /// # Errors
    /// `TxError::Domain` carries the closure's error, `TxError::Infra` a
    /// failure to begin or commit.
    pub async fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, TxError<E>>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T, E> + Send,
        T: Send,
        E: Send,
    {
        run_in_transaction(&self.sea, f).await
    }

    /// Close the pool.
    pub async fn close(self) {
        if let Err(e) = self.sea.close().await {
            tracing::warn!(error = %e, "Failed to close database connection");
        }
    }
}

/// DSN with the password replaced by `***`. Unparseable DSNs that carry
/// credentials are redacted entirely.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: &str) -> String {
    if !dsn.contains('@') {
        return dsn.to_owned();
    }
    match url::Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
                return "***".to_owned();
            }
            parsed.to_string()
        }
        Err(_) => "***".to_owned(),
    }
}
