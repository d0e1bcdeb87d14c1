//! Connection lifecycle management.
//!
//! [`Store`] owns the physical connection pool and is the single shared
//! access point to it. It is an explicitly constructed component: the
//! composition root creates exactly one per process and hands it out by
//! reference; there is no process-global instance.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::redaction::redact_connection_url;

/// Outcome of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health probe result: status plus round-trip latency when healthy.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
}

/// Manager for the world-state connection pool.
#[derive(Debug, Default)]
pub struct Store {
    pool: RwLock<Option<PgPool>>,
}

impl Store {
    /// A manager with no pool. Call [`initialize`](Store::initialize) before
    /// using any accessor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the connection pool.
    ///
    /// Idempotent: initializing an already-initialized store logs a warning
    /// and keeps the first pool. With no explicit config, the target is
    /// resolved from the environment ([`StoreConfig::from_env`]). Fails with
    /// [`Error::Configuration`] when no usable connection target resolves.
    ///
    /// The pool connects lazily; no round trip happens here. Concurrent
    /// callers racing `initialize` should serialize startup themselves.
    pub fn initialize(&self, config: Option<StoreConfig>) -> Result<()> {
        let mut slot = write_lock(&self.pool);
        if slot.is_some() {
            tracing::warn!(event = "store_already_initialized");
            return Ok(());
        }

        let config = config.unwrap_or_else(StoreConfig::from_env);
        if !config.has_connection_target() {
            return Err(Error::Configuration(
                "no database connection target resolvable (host/database empty)".to_string(),
            ));
        }

        let url = config.connection_url();
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(config.idle_timeout())
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&url)
            .map_err(|err| Error::Configuration(err.to_string()))?;

        tracing::info!(
            event = "store_initialized",
            url = %redact_connection_url(&url),
            max_connections = config.max_connections,
        );
        *slot = Some(pool);
        Ok(())
    }

    /// The live pool, for callers issuing statements.
    ///
    /// This is the single accessor: `PgPool` serves as both the typed store
    /// handle and the raw pool, so there is no separate handle type. It is a
    /// cheap handle over shared state; cloning it does not create
    /// connections.
    pub fn pool(&self) -> Result<PgPool> {
        read_lock(&self.pool).clone().ok_or(Error::NotInitialized)
    }

    /// Whether a trivial round-trip query currently succeeds. Probe failures
    /// are logged and swallowed, never propagated.
    pub async fn is_connected(&self) -> bool {
        let Some(pool) = read_lock(&self.pool).clone() else {
            return false;
        };
        match probe(&pool).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(event = "connectivity_check_failed", error = %err);
                false
            }
        }
    }

    /// Round-trip probe with measured latency. Returns unhealthy with no
    /// latency when the pool does not exist or the probe fails.
    pub async fn health_check(&self) -> HealthReport {
        let Some(pool) = read_lock(&self.pool).clone() else {
            return HealthReport {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
            };
        };

        let start = Instant::now();
        match probe(&pool).await {
            Ok(()) => HealthReport {
                status: HealthStatus::Healthy,
                latency_ms: Some(start.elapsed().as_millis() as u64),
            },
            Err(err) => {
                tracing::error!(event = "health_check_failed", error = %err);
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    latency_ms: None,
                }
            }
        }
    }

    /// Drain and close the pool, then reset so a later `initialize` can
    /// build a fresh one. Closing a never-opened or already-closed store is
    /// a no-op. In-flight queries finish or fail naturally as the pool
    /// drains; they are not aborted.
    pub async fn close(&self) {
        let pool = write_lock(&self.pool).take();
        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!(event = "store_closed");
        }
    }
}

async fn probe(pool: &PgPool) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("select 1").execute(pool).await.map(|_| ())
}

// A poisoned lock only means another thread panicked mid-access; the slot is
// an Option swap, so the value is still coherent and we keep going.
fn read_lock(lock: &RwLock<Option<PgPool>>) -> RwLockReadGuard<'_, Option<PgPool>> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(lock: &RwLock<Option<PgPool>>) -> RwLockWriteGuard<'_, Option<PgPool>> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fail_before_initialize() {
        let store = Store::new();
        assert!(matches!(store.pool(), Err(Error::NotInitialized)));
    }

    #[tokio::test]
    async fn health_check_without_pool_is_unhealthy() {
        let store = Store::new();
        let report = store.health_check().await;
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert!(report.latency_ms.is_none());
        assert!(!store.is_connected().await);
    }

    #[tokio::test]
    async fn close_before_initialize_is_a_no_op() {
        let store = Store::new();
        store.close().await;
        store.close().await;
        assert!(matches!(store.pool(), Err(Error::NotInitialized)));
    }

    #[test]
    fn initialize_rejects_empty_target() {
        let store = Store::new();
        let config = StoreConfig {
            host: String::new(),
            ..StoreConfig::default()
        };
        assert!(matches!(
            store.initialize(Some(config)),
            Err(Error::Configuration(_))
        ));
        // A failed initialize leaves the store uninitialized.
        assert!(matches!(store.pool(), Err(Error::NotInitialized)));
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = Store::new();
        store.initialize(Some(StoreConfig::default())).unwrap();
        let first = store.pool().unwrap();

        // Second call with a different config keeps the first pool.
        let other = StoreConfig {
            database: "other".to_string(),
            max_connections: 1,
            ..StoreConfig::default()
        };
        store.initialize(Some(other)).unwrap();
        let second = store.pool().unwrap();
        assert!(first.is_closed() == second.is_closed());
        assert_eq!(second.options().get_max_connections(), 20);
    }

    #[tokio::test]
    async fn close_resets_for_reinitialize() {
        let store = Store::new();
        store.initialize(Some(StoreConfig::default())).unwrap();
        store.close().await;
        assert!(matches!(store.pool(), Err(Error::NotInitialized)));
        store.initialize(Some(StoreConfig::default())).unwrap();
        assert!(store.pool().is_ok());
        store.close().await;
    }
}
