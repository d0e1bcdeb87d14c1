use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::{InventoryOwnerType, InventoryType};
use crate::error::Result;
use crate::owner::InventoryOwner;

/// Definition of an item kind; instances reference it by id and the
/// template cannot be deleted while instances remain.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemTemplate {
    pub id: Uuid,
    /// Internal name, e.g. "bread".
    pub name: String,
    pub label: String,
    /// Grams.
    pub weight: i32,
    pub stackable: bool,
    pub max_stack: i32,
    pub usable: bool,
    pub use_effects: Value,
    pub metadata_schema: Value,
    pub created_at: DateTime<Utc>,
}

impl Entity for ItemTemplate {
    const TABLE: &'static str = "item_templates";
}

/// A slot-addressed item container with a polymorphic owner.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    pub id: Uuid,
    pub owner_type: InventoryOwnerType,
    pub owner_account_id: Option<Uuid>,
    pub owner_character_id: Option<Uuid>,
    pub owner_business_id: Option<Uuid>,
    pub r#type: InventoryType,
    /// Slots.
    pub capacity: i32,
    /// Grams.
    pub weight_limit: i32,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    /// The validated owner of this inventory.
    pub fn owner(&self) -> Result<InventoryOwner> {
        InventoryOwner::try_from_columns(
            self.owner_type,
            (
                self.owner_account_id,
                self.owner_character_id,
                self.owner_business_id,
            ),
        )
    }
}

impl Entity for Inventory {
    const TABLE: &'static str = "inventories";
}

/// An item stack in one slot of one inventory; slot unique per inventory.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub template_id: Uuid,
    pub quantity: i32,
    pub slot: i16,
    pub durability: i16,
    /// Optional per-stack override of the template weight.
    pub custom_weight: Option<i32>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl Entity for InventoryItem {
    const TABLE: &'static str = "inventory_items";
}
