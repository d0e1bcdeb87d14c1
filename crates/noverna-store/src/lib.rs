//! Postgres-backed world-state store for the Noverna game server.
//!
//! This crate owns the connection pool lifecycle ([`Store`]), the schema
//! migrations, and the per-domain query façades under [`queries`]. The
//! domain contracts themselves (entities, enums, owner sum types, the
//! relation registry) live in `noverna-core`.

pub mod config;
pub mod error;
pub mod queries;
pub mod redaction;
pub mod resolver;
pub mod service;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use redaction::redact_connection_url;
pub use resolver::{fetch_related, fetch_related_one};
pub use service::{HealthReport, HealthStatus, Store};

/// Embedded schema migrations, applied with [`run_migrations`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Bring a database up to the current schema.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|err| Error::Db(sqlx::Error::Migrate(Box::new(err))))?;
    Ok(())
}
