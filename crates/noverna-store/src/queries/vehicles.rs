//! Garage and vehicle operations.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Garage, GarageType, Vehicle, VehicleKey, VehicleLog, VehicleOwner, VehicleState};

use crate::error::Result;

pub async fn create_garage(
    pool: &PgPool,
    name: &str,
    label: &str,
    garage_type: GarageType,
    is_impound: bool,
    business_id: Option<Uuid>,
) -> Result<Garage> {
    let garage = sqlx::query_as::<_, Garage>(
        r#"
        insert into garages (name, label, type, is_impound, business_id)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(name)
    .bind(label)
    .bind(garage_type)
    .bind(is_impound)
    .bind(business_id)
    .fetch_one(pool)
    .await?;
    Ok(garage)
}

/// Register a vehicle under one owner. A duplicate plate surfaces as a
/// constraint conflict.
pub async fn register_vehicle(
    pool: &PgPool,
    plate: &str,
    model: &str,
    owner: VehicleOwner,
    garage_id: Option<Uuid>,
) -> Result<Vehicle> {
    let (account_id, character_id, business_id) = owner.into_columns();
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        insert into vehicles (plate, model, account_id, character_id, business_id, garage_id)
        values ($1, $2, $3, $4, $5, $6)
        returning *
        "#,
    )
    .bind(plate)
    .bind(model)
    .bind(account_id)
    .bind(character_id)
    .bind(business_id)
    .bind(garage_id)
    .fetch_one(pool)
    .await?;
    Ok(vehicle)
}

pub async fn fetch_vehicle_by_plate(pool: &PgPool, plate: &str) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("select * from vehicles where plate = $1")
        .bind(plate)
        .fetch_optional(pool)
        .await?;
    Ok(vehicle)
}

pub async fn store_vehicle(pool: &PgPool, vehicle_id: Uuid, garage_id: Uuid) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        update vehicles
        set garage_id = $2, state = 'stored', updated_at = now()
        where id = $1
        returning *
        "#,
    )
    .bind(vehicle_id)
    .bind(garage_id)
    .fetch_optional(pool)
    .await?;
    Ok(vehicle)
}

/// Take a vehicle out of its garage.
pub async fn retrieve_vehicle(pool: &PgPool, vehicle_id: Uuid) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        update vehicles
        set garage_id = null, state = 'out', updated_at = now()
        where id = $1
        returning *
        "#,
    )
    .bind(vehicle_id)
    .fetch_optional(pool)
    .await?;
    Ok(vehicle)
}

pub async fn set_vehicle_state(
    pool: &PgPool,
    vehicle_id: Uuid,
    state: VehicleState,
) -> Result<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        "update vehicles set state = $2, updated_at = now() where id = $1 returning *",
    )
    .bind(vehicle_id)
    .bind(state)
    .fetch_optional(pool)
    .await?;
    Ok(vehicle)
}

/// Grant an account a key to a vehicle; one grant per (vehicle, account).
pub async fn grant_vehicle_key(
    pool: &PgPool,
    vehicle_id: Uuid,
    account_id: Uuid,
    granted_by: Option<Uuid>,
) -> Result<VehicleKey> {
    let key = sqlx::query_as::<_, VehicleKey>(
        r#"
        insert into vehicle_keys (vehicle_id, account_id, granted_by_account_id)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(vehicle_id)
    .bind(account_id)
    .bind(granted_by)
    .fetch_one(pool)
    .await?;
    Ok(key)
}

pub async fn revoke_vehicle_key(pool: &PgPool, vehicle_id: Uuid, account_id: Uuid) -> Result<bool> {
    let result = sqlx::query("delete from vehicle_keys where vehicle_id = $1 and account_id = $2")
        .bind(vehicle_id)
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn log_vehicle_action(
    pool: &PgPool,
    vehicle_id: Uuid,
    action: &str,
    actor_account_id: Option<Uuid>,
    meta: &Value,
) -> Result<VehicleLog> {
    let log = sqlx::query_as::<_, VehicleLog>(
        r#"
        insert into vehicle_logs (vehicle_id, action, actor_account_id, meta)
        values ($1, $2, $3, $4)
        returning *
        "#,
    )
    .bind(vehicle_id)
    .bind(action)
    .bind(actor_account_id)
    .bind(meta)
    .fetch_one(pool)
    .await?;
    Ok(log)
}
