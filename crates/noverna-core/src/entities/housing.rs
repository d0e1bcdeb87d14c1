use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::PropertyType;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub r#type: PropertyType,
    pub position: Value,
    pub interior_id: Option<String>,
    pub price: i64,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Property {
    const TABLE: &'static str = "properties";
}

/// A rentable/ownable unit; unit numbers are unique per property. The
/// optional storage inventory is independently owned and survives via
/// set-null if the inventory goes away.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyUnit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub entrance_position: Value,
    pub storage_inventory_id: Option<Uuid>,
}

impl Entity for PropertyUnit {
    const TABLE: &'static str = "property_units";
}

/// Ownership or tenancy of a unit by an account or a character.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyOwnership {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub account_id: Option<Uuid>,
    pub character_id: Option<Uuid>,
    pub is_owner: bool,
    pub rent: i64,
    pub active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Entity for PropertyOwnership {
    const TABLE: &'static str = "property_ownerships";
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyKey {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub account_id: Option<Uuid>,
    pub character_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Entity for PropertyKey {
    const TABLE: &'static str = "property_keys";
}

/// Lock/unlock/enter/exit/transfer history for a unit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyLog {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub action: String,
    pub actor_account_id: Option<Uuid>,
    pub actor_character_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub meta: Value,
}

impl Entity for PropertyLog {
    const TABLE: &'static str = "property_logs";
}
