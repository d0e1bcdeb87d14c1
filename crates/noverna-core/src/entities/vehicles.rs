use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::{GarageType, VehicleState};
use crate::error::Result;
use crate::owner::VehicleOwner;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Garage {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub r#type: GarageType,
    pub position: Value,
    pub radius: i16,
    pub capacity: i16,
    pub is_impound: bool,
    /// Filled for business garages.
    pub business_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Garage {
    const TABLE: &'static str = "garages";
}

/// A persistent vehicle. The plate is globally unique. Owner references are
/// all set-null: the vehicle outlives whichever record owned it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    /// Model name or hash string.
    pub model: String,
    pub account_id: Option<Uuid>,
    pub character_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub garage_id: Option<Uuid>,
    pub state: VehicleState,
    pub fuel: i16,
    pub health: i32,
    pub properties: Value,
    pub position: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// The validated owner, or `None` for an unowned vehicle (e.g. after its
    /// owning account was deleted).
    pub fn owner(&self) -> Result<Option<VehicleOwner>> {
        VehicleOwner::try_from_columns((self.account_id, self.character_id, self.business_id))
    }
}

impl Entity for Vehicle {
    const TABLE: &'static str = "vehicles";
}

/// A key grant for one vehicle to one account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleKey {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub account_id: Uuid,
    pub granted_by_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Entity for VehicleKey {
    const TABLE: &'static str = "vehicle_keys";
}

/// Spawn/store/impound/lock/unlock/transfer history.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VehicleLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub action: String,
    pub actor_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub meta: Value,
}

impl Entity for VehicleLog {
    const TABLE: &'static str = "vehicle_logs";
}
