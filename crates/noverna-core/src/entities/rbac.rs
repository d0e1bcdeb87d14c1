use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Role {
    const TABLE: &'static str = "roles";
}

/// A named capability. Permissions are a closed vocabulary, so the name is
/// the primary key rather than a generated identifier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    pub name: String,
    pub description: Option<String>,
}

impl Entity for Permission {
    const TABLE: &'static str = "permissions";
}

/// One role held by one account; unique per (account, role).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub role_id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by_account_id: Option<Uuid>,
}

impl Entity for RoleAssignment {
    const TABLE: &'static str = "role_assignments";
}

/// One permission granted to one role; composite natural key, no surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_name: String,
}

impl Entity for RolePermission {
    const TABLE: &'static str = "role_permissions";
}
