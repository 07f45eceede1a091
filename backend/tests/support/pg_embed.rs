//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own database on a cluster shared by the test binary,
//! migrated with the same embedded migrations the server applies at
//! startup. Where PostgreSQL cannot be bootstrapped, set
//! `SKIP_TEST_CLUSTER=1` to skip these suites instead of failing them.
//!
//! The suites are synchronous and drive the async adapters through a
//! runtime owned by [`MigratedDatabase`]: the cluster bootstrap blocks and
//! must not run inside a Tokio worker.

#![allow(dead_code)]

use std::future::Future;
use std::sync::Once;

use complaints::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

/// A migrated throwaway database plus a pool onto it.
///
/// Field order matters: the pool closes its connections before the runtime
/// stops, and both go before the database is dropped.
pub struct MigratedDatabase {
    pub pool: DbPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl MigratedDatabase {
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

static STABLE_PASSWORD: Once = Once::new();

/// Pin `PG_PASSWORD` so a data directory left by an earlier test binary
/// still accepts our connections; the cluster otherwise picks a random one.
fn ensure_stable_password() {
    STABLE_PASSWORD.call_once(|| {
        if std::env::var_os("PG_PASSWORD").is_none() {
            // SAFETY: runs once per process, before the cluster bootstrap
            // starts its own threads.
            unsafe { std::env::set_var("PG_PASSWORD", "complaints_embedded_test") };
        }
    });
}

fn provision() -> Result<MigratedDatabase, String> {
    ensure_stable_password();
    let cluster = shared_cluster_handle().map_err(|err| format!("cluster: {err:?}"))?;
    let name = format!("complaints_test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();

    let runtime = Runtime::new().map_err(|err| format!("runtime: {err}"))?;
    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
            .await
            .map_err(|err| err.to_string())
    })?;

    Ok(MigratedDatabase {
        pool,
        runtime,
        _database: database,
    })
}

/// Provision a fresh database, or `None` when the cluster is unavailable
/// and `SKIP_TEST_CLUSTER` is set.
pub fn migrated_database() -> Option<MigratedDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) if should_skip_test_cluster() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
