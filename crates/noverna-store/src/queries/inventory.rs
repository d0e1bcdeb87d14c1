//! Inventory operations. Every write of owner columns goes through the
//! [`InventoryOwner`] sum type, so exclusivity violations are rejected
//! before any statement runs.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Inventory, InventoryItem, InventoryOwner, InventoryType, ItemTemplate};

use crate::error::Result;

pub async fn create_item_template(
    pool: &PgPool,
    name: &str,
    label: &str,
    weight: i32,
    stackable: bool,
    max_stack: i32,
    usable: bool,
) -> Result<ItemTemplate> {
    let template = sqlx::query_as::<_, ItemTemplate>(
        r#"
        insert into item_templates (name, label, weight, stackable, max_stack, usable)
        values ($1, $2, $3, $4, $5, $6)
        returning *
        "#,
    )
    .bind(name)
    .bind(label)
    .bind(weight)
    .bind(stackable)
    .bind(max_stack)
    .bind(usable)
    .fetch_one(pool)
    .await?;
    Ok(template)
}

pub async fn create_inventory(
    pool: &PgPool,
    owner: InventoryOwner,
    inventory_type: InventoryType,
    capacity: i32,
    weight_limit: i32,
) -> Result<Inventory> {
    let (account_id, character_id, business_id) = owner.into_columns();
    let inventory = sqlx::query_as::<_, Inventory>(
        r#"
        insert into inventories
          (owner_type, owner_account_id, owner_character_id, owner_business_id,
           type, capacity, weight_limit)
        values ($1, $2, $3, $4, $5, $6, $7)
        returning *
        "#,
    )
    .bind(owner.owner_type())
    .bind(account_id)
    .bind(character_id)
    .bind(business_id)
    .bind(inventory_type)
    .bind(capacity)
    .bind(weight_limit)
    .fetch_one(pool)
    .await?;
    Ok(inventory)
}

/// Find an owner's inventory of the given type.
pub async fn fetch_inventory_for_owner(
    pool: &PgPool,
    owner: InventoryOwner,
    inventory_type: InventoryType,
) -> Result<Option<Inventory>> {
    let (account_id, character_id, business_id) = owner.into_columns();
    let inventory = sqlx::query_as::<_, Inventory>(
        r#"
        select * from inventories
        where owner_type = $1
          and owner_account_id is not distinct from $2
          and owner_character_id is not distinct from $3
          and owner_business_id is not distinct from $4
          and type = $5
        "#,
    )
    .bind(owner.owner_type())
    .bind(account_id)
    .bind(character_id)
    .bind(business_id)
    .bind(inventory_type)
    .fetch_optional(pool)
    .await?;
    Ok(inventory)
}

/// Place an item stack into a slot. A occupied slot surfaces as a constraint
/// conflict: one stack per (inventory, slot).
pub async fn add_item(
    pool: &PgPool,
    inventory_id: Uuid,
    template_id: Uuid,
    quantity: i32,
    slot: i16,
    metadata: &Value,
) -> Result<InventoryItem> {
    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        insert into inventory_items (inventory_id, template_id, quantity, slot, metadata)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(inventory_id)
    .bind(template_id)
    .bind(quantity)
    .bind(slot)
    .bind(metadata)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn move_item(
    pool: &PgPool,
    item_id: Uuid,
    inventory_id: Uuid,
    slot: i16,
) -> Result<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        update inventory_items
        set inventory_id = $2, slot = $3
        where id = $1
        returning *
        "#,
    )
    .bind(item_id)
    .bind(inventory_id)
    .bind(slot)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn remove_item(pool: &PgPool, item_id: Uuid) -> Result<bool> {
    let result = sqlx::query("delete from inventory_items where id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_items(pool: &PgPool, inventory_id: Uuid) -> Result<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(
        "select * from inventory_items where inventory_id = $1 order by slot",
    )
    .bind(inventory_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}
