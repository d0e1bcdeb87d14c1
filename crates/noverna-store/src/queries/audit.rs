//! Append-only audit trail. Like the economy ledger, rows only ever insert;
//! guard triggers reject deletes and rewrites.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::AuditLog;

use crate::error::Result;

pub async fn record_audit(
    pool: &PgPool,
    actor_account_id: Option<Uuid>,
    action: &str,
    target_type: Option<&str>,
    target_id: Option<&str>,
    meta: &Value,
) -> Result<AuditLog> {
    let log = sqlx::query_as::<_, AuditLog>(
        r#"
        insert into audit_logs (actor_account_id, action, target_type, target_id, meta)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(actor_account_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(meta)
    .fetch_one(pool)
    .await?;
    Ok(log)
}

pub async fn audit_trail_for_target(
    pool: &PgPool,
    target_type: &str,
    target_id: &str,
    limit: i64,
) -> Result<Vec<AuditLog>> {
    let logs = sqlx::query_as::<_, AuditLog>(
        r#"
        select * from audit_logs
        where target_type = $1 and target_id = $2
        order by created_at desc
        limit $3
        "#,
    )
    .bind(target_type)
    .bind(target_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

pub async fn audit_trail_for_actor(
    pool: &PgPool,
    actor_account_id: Uuid,
    limit: i64,
) -> Result<Vec<AuditLog>> {
    let logs = sqlx::query_as::<_, AuditLog>(
        r#"
        select * from audit_logs
        where actor_account_id = $1
        order by created_at desc
        limit $2
        "#,
    )
    .bind(actor_account_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(logs)
}
