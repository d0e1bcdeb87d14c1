//! Play-session operations.
//!
//! The schema allows at most one open session per account (partial unique
//! index on null `ended_at`), so [`open_session`] closes any stale open
//! session in the same transaction before inserting the new one.

use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use noverna_core::PlaySession;

use crate::error::Result;

pub async fn open_session(
    pool: &PgPool,
    account_id: Uuid,
    source_ip: Option<&str>,
    meta: &Value,
) -> Result<PlaySession> {
    let mut tx = pool.begin().await?;

    let superseded = sqlx::query(
        r#"
        update play_sessions
        set ended_at = now(), ended_reason = 'superseded'
        where account_id = $1 and ended_at is null
        "#,
    )
    .bind(account_id)
    .execute(&mut *tx)
    .await?;
    if superseded.rows_affected() > 0 {
        warn!(
            event = "stale_session_superseded",
            account_id = %account_id,
            count = superseded.rows_affected(),
        );
    }

    let session = sqlx::query_as::<_, PlaySession>(
        r#"
        insert into play_sessions (account_id, source_ip, meta)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(account_id)
    .bind(source_ip)
    .bind(meta)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(session)
}

/// Bump `last_seen_at` on an open session.
pub async fn heartbeat(pool: &PgPool, session_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "update play_sessions set last_seen_at = now() where id = $1 and ended_at is null",
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn close_session(
    pool: &PgPool,
    session_id: Uuid,
    reason: Option<&str>,
) -> Result<Option<PlaySession>> {
    let session = sqlx::query_as::<_, PlaySession>(
        r#"
        update play_sessions
        set ended_at = now(), last_seen_at = now(), ended_reason = $2
        where id = $1 and ended_at is null
        returning *
        "#,
    )
    .bind(session_id)
    .bind(reason)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

pub async fn open_session_for(pool: &PgPool, account_id: Uuid) -> Result<Option<PlaySession>> {
    let session = sqlx::query_as::<_, PlaySession>(
        "select * from play_sessions where account_id = $1 and ended_at is null",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

pub async fn session_history(
    pool: &PgPool,
    account_id: Uuid,
    limit: i64,
) -> Result<Vec<PlaySession>> {
    let sessions = sqlx::query_as::<_, PlaySession>(
        r#"
        select * from play_sessions
        where account_id = $1
        order by started_at desc
        limit $2
        "#,
    )
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}
