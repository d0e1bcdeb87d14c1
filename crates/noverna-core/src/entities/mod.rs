//! The entity catalog: one row struct per table, grouped by schema domain.

pub mod accounts;
pub mod audit;
pub mod businesses;
pub mod characters;
pub mod configs;
pub mod economy;
pub mod housing;
pub mod inventory;
pub mod jobs;
pub mod phone;
pub mod rbac;
pub mod sessions;
pub mod vehicles;

/// A catalog row type bound to its table name.
///
/// The relation resolver uses `TABLE` to check, at call time, that a named
/// relation is being materialized into the right row type.
pub trait Entity: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin {
    const TABLE: &'static str;
}
