//! Property and unit operations. Ownerships and keys are scoped to a unit
//! and to one party (account or character) via [`PartyRef`].

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{
    PartyRef, Property, PropertyKey, PropertyLog, PropertyOwnership, PropertyType, PropertyUnit,
};

use crate::error::Result;

pub async fn create_property(
    pool: &PgPool,
    name: &str,
    label: &str,
    property_type: PropertyType,
    price: i64,
) -> Result<Property> {
    let property = sqlx::query_as::<_, Property>(
        r#"
        insert into properties (name, label, type, price)
        values ($1, $2, $3, $4)
        returning *
        "#,
    )
    .bind(name)
    .bind(label)
    .bind(property_type)
    .bind(price)
    .fetch_one(pool)
    .await?;
    Ok(property)
}

/// Add a unit to a property; unit numbers are unique per property.
pub async fn create_unit(
    pool: &PgPool,
    property_id: Uuid,
    unit_number: &str,
    storage_inventory_id: Option<Uuid>,
) -> Result<PropertyUnit> {
    let unit = sqlx::query_as::<_, PropertyUnit>(
        r#"
        insert into property_units (property_id, unit_number, storage_inventory_id)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(property_id)
    .bind(unit_number)
    .bind(storage_inventory_id)
    .fetch_one(pool)
    .await?;
    Ok(unit)
}

pub async fn grant_ownership(
    pool: &PgPool,
    unit_id: Uuid,
    party: PartyRef,
    is_owner: bool,
    rent: i64,
) -> Result<PropertyOwnership> {
    let (account_id, character_id) = party.into_columns();
    let ownership = sqlx::query_as::<_, PropertyOwnership>(
        r#"
        insert into property_ownerships (unit_id, account_id, character_id, is_owner, rent)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(unit_id)
    .bind(account_id)
    .bind(character_id)
    .bind(is_owner)
    .bind(rent)
    .fetch_one(pool)
    .await?;
    Ok(ownership)
}

/// Close out an ownership; the row stays for history.
pub async fn end_ownership(pool: &PgPool, ownership_id: Uuid) -> Result<Option<PropertyOwnership>> {
    let ownership = sqlx::query_as::<_, PropertyOwnership>(
        r#"
        update property_ownerships
        set active = false, ended_at = now()
        where id = $1 and active = true
        returning *
        "#,
    )
    .bind(ownership_id)
    .fetch_optional(pool)
    .await?;
    Ok(ownership)
}

pub async fn grant_property_key(pool: &PgPool, unit_id: Uuid, party: PartyRef) -> Result<PropertyKey> {
    let (account_id, character_id) = party.into_columns();
    let key = sqlx::query_as::<_, PropertyKey>(
        r#"
        insert into property_keys (unit_id, account_id, character_id)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(unit_id)
    .bind(account_id)
    .bind(character_id)
    .fetch_one(pool)
    .await?;
    Ok(key)
}

pub async fn revoke_property_key(pool: &PgPool, unit_id: Uuid, party: PartyRef) -> Result<bool> {
    let (account_id, character_id) = party.into_columns();
    let result = sqlx::query(
        r#"
        delete from property_keys
        where unit_id = $1
          and account_id is not distinct from $2
          and character_id is not distinct from $3
        "#,
    )
    .bind(unit_id)
    .bind(account_id)
    .bind(character_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn log_unit_action(
    pool: &PgPool,
    unit_id: Uuid,
    action: &str,
    actor_account_id: Option<Uuid>,
    actor_character_id: Option<Uuid>,
    meta: &Value,
) -> Result<PropertyLog> {
    let log = sqlx::query_as::<_, PropertyLog>(
        r#"
        insert into property_logs (unit_id, action, actor_account_id, actor_character_id, meta)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(unit_id)
    .bind(action)
    .bind(actor_account_id)
    .bind(actor_character_id)
    .bind(meta)
    .fetch_one(pool)
    .await?;
    Ok(log)
}
