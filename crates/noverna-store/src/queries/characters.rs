//! Character operations. Soft-deleted characters stay behind for audit and
//! are excluded from every `fetch_active`/`list_active` path.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Character, CharacterAppearance, CharacterFlag, CharacterGender};

use crate::error::Result;

pub async fn create_character(
    pool: &PgPool,
    account_id: Uuid,
    cid: &str,
    first_name: &str,
    last_name: &str,
    gender: CharacterGender,
    date_of_birth: Option<&str>,
) -> Result<Character> {
    let character = sqlx::query_as::<_, Character>(
        r#"
        insert into characters (account_id, cid, first_name, last_name, gender, date_of_birth)
        values ($1, $2, $3, $4, $5, $6)
        returning *
        "#,
    )
    .bind(account_id)
    .bind(cid)
    .bind(first_name)
    .bind(last_name)
    .bind(gender)
    .bind(date_of_birth)
    .fetch_one(pool)
    .await?;
    Ok(character)
}

pub async fn fetch_active_character(pool: &PgPool, id: Uuid) -> Result<Option<Character>> {
    let character = sqlx::query_as::<_, Character>(
        "select * from characters where id = $1 and is_deleted = false",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(character)
}

pub async fn fetch_active_character_by_cid(pool: &PgPool, cid: &str) -> Result<Option<Character>> {
    let character = sqlx::query_as::<_, Character>(
        "select * from characters where cid = $1 and is_deleted = false",
    )
    .bind(cid)
    .fetch_optional(pool)
    .await?;
    Ok(character)
}

pub async fn list_active_characters(pool: &PgPool, account_id: Uuid) -> Result<Vec<Character>> {
    let characters = sqlx::query_as::<_, Character>(
        r#"
        select * from characters
        where account_id = $1 and is_deleted = false
        order by created_at
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(characters)
}

/// Mark a character deleted. The row (and its cid) stays behind.
pub async fn soft_delete_character(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "update characters set is_deleted = true, updated_at = now() where id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_character_position(pool: &PgPool, id: Uuid, position: &Value) -> Result<bool> {
    let result = sqlx::query(
        "update characters set position = $2, updated_at = now() where id = $1",
    )
    .bind(id)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn upsert_appearance(
    pool: &PgPool,
    character_id: Uuid,
    ped_model: &str,
    components: &Value,
    overlays: &Value,
    props: &Value,
) -> Result<CharacterAppearance> {
    let appearance = sqlx::query_as::<_, CharacterAppearance>(
        r#"
        insert into character_appearances (character_id, ped_model, components, overlays, props)
        values ($1, $2, $3, $4, $5)
        on conflict (character_id) do update set
          ped_model = excluded.ped_model,
          components = excluded.components,
          overlays = excluded.overlays,
          props = excluded.props,
          updated_at = now()
        returning *
        "#,
    )
    .bind(character_id)
    .bind(ped_model)
    .bind(components)
    .bind(overlays)
    .bind(props)
    .fetch_one(pool)
    .await?;
    Ok(appearance)
}

pub async fn set_character_flag(
    pool: &PgPool,
    character_id: Uuid,
    key: &str,
    value: &Value,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<CharacterFlag> {
    let flag = sqlx::query_as::<_, CharacterFlag>(
        r#"
        insert into character_flags (character_id, key, value, expires_at)
        values ($1, $2, $3, $4)
        on conflict (character_id, key) do update set
          value = excluded.value,
          expires_at = excluded.expires_at
        returning *
        "#,
    )
    .bind(character_id)
    .bind(key)
    .bind(value)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;
    Ok(flag)
}

pub async fn clear_character_flag(pool: &PgPool, character_id: Uuid, key: &str) -> Result<bool> {
    let result = sqlx::query("delete from character_flags where character_id = $1 and key = $2")
        .bind(character_id)
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
