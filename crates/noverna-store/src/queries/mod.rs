//! Per-domain query façades. One free function per operation, each taking
//! a `&PgPool`; callers fetch the pool from [`crate::Store`].

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
