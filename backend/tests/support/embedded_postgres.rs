//! Per-test PostgreSQL databases on a shared embedded cluster.
//!
//! The cluster is started once per test binary by `pg-embed-setup-unpriv`.
//! Every call to [`migrated_database`] creates a fresh database, applies the
//! crate's embedded migrations through [`run_migrations`], and opens a pool
//! on it. The database is dropped with the returned handle.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

use linktree::outbound::persistence::{DbPool, PoolConfig, run_migrations};

/// Enough connections for the concurrency cases to overlap on the server.
const POOL_SIZE: u32 = 8;

/// A migrated database plus the runtime its pool lives on.
///
/// Field order is drop order: the pool goes first, then the runtime that
/// drives its connections, and the database last.
pub struct MigratedDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    database: TemporaryDatabase,
}

impl MigratedDatabase {
    /// Connection string of the per-test database.
    pub fn url(&self) -> String {
        self.database.url().to_string()
    }

    /// Drive `fut` to completion on this database's runtime.
    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

/// Provision a fresh database with the current schema.
///
/// # Errors
/// Returns a printable reason when the cluster, the database, the migrations
/// or the pool cannot be brought up.
pub fn migrated_database() -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database_name = format!("linktree_test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(database_name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();

    runtime
        .block_on(run_migrations(&url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(url).with_max_size(POOL_SIZE)))
        .map_err(|err| err.to_string())?;

    Ok(MigratedDatabase {
        pool,
        runtime,
        database,
    })
}
