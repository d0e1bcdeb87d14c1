use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;

/// A player-owned organization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub bank_balance: i64,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Business {
    const TABLE: &'static str = "businesses";
}

/// A rank within a business; name and rank number are each unique per
/// business.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessRole {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub label: String,
    pub rank: i16,
    /// Free-form permission strings interpreted by business game logic.
    pub permissions: Value,
}

impl Entity for BusinessRole {
    const TABLE: &'static str = "business_roles";
}

/// One account's membership in one business. The role must belong to the
/// same business (composite foreign key, mirrored by façade validation).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessMembership {
    pub id: Uuid,
    pub business_id: Uuid,
    pub account_id: Uuid,
    pub role_id: Uuid,
    pub is_owner: bool,
    pub hired_at: DateTime<Utc>,
}

impl Entity for BusinessMembership {
    const TABLE: &'static str = "business_memberships";
}
