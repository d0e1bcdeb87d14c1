//! Namespaced key/value settings.

use serde_json::Value;
use sqlx::PgPool;

use noverna_core::ConfigEntry;

use crate::error::Result;

pub async fn set_config(
    pool: &PgPool,
    namespace: &str,
    key: &str,
    value: &Value,
) -> Result<ConfigEntry> {
    let entry = sqlx::query_as::<_, ConfigEntry>(
        r#"
        insert into configs (namespace, key, value)
        values ($1, $2, $3)
        on conflict (namespace, key) do update
          set value = excluded.value, updated_at = now()
        returning *
        "#,
    )
    .bind(namespace)
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await?;
    Ok(entry)
}

pub async fn get_config(pool: &PgPool, namespace: &str, key: &str) -> Result<Option<ConfigEntry>> {
    let entry = sqlx::query_as::<_, ConfigEntry>(
        "select * from configs where namespace = $1 and key = $2",
    )
    .bind(namespace)
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

pub async fn list_namespace(pool: &PgPool, namespace: &str) -> Result<Vec<ConfigEntry>> {
    let entries = sqlx::query_as::<_, ConfigEntry>(
        "select * from configs where namespace = $1 order by key",
    )
    .bind(namespace)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

pub async fn delete_config(pool: &PgPool, namespace: &str, key: &str) -> Result<bool> {
    let result = sqlx::query("delete from configs where namespace = $1 and key = $2")
        .bind(namespace)
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
