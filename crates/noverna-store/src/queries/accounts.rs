//! Account, identifier, whitelist, and ban operations.

use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Account, AccountIdentifier, Ban, IdentifierType, WhitelistEntry, WhitelistStatus};

use crate::error::{Error, Result};

pub async fn create_account(
    pool: &PgPool,
    username: Option<&str>,
    display_name: Option<&str>,
    email: Option<&str>,
) -> Result<Account> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        insert into accounts (username, display_name, email)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(username)
    .bind(display_name)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(account)
}

pub async fn fetch_account(pool: &PgPool, id: Uuid) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("select * from accounts where id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(account)
}

pub async fn fetch_account_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("select * from accounts where email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(account)
}

/// Resolve the account bound to a device/network identifier.
pub async fn fetch_account_by_identifier(
    pool: &PgPool,
    identifier_type: IdentifierType,
    value: &str,
) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        select a.* from accounts a
        join account_identifiers i on i.account_id = a.id
        where i.type = $1 and i.value = $2
        "#,
    )
    .bind(identifier_type)
    .bind(value)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Bind an identifier to an account, or refresh `last_seen_at` when it is
/// already bound to the same account. An identifier held by a different
/// account surfaces as a constraint conflict: one account per (type, value).
pub async fn record_identifier(
    pool: &PgPool,
    account_id: Uuid,
    identifier_type: IdentifierType,
    value: &str,
) -> Result<AccountIdentifier> {
    let identifier = sqlx::query_as::<_, AccountIdentifier>(
        r#"
        insert into account_identifiers (account_id, type, value)
        values ($1, $2, $3)
        on conflict (type, value) do update set last_seen_at = now()
          where account_identifiers.account_id = excluded.account_id
        returning *
        "#,
    )
    .bind(account_id)
    .bind(identifier_type)
    .bind(value)
    .fetch_optional(pool)
    .await?;

    identifier.ok_or_else(|| Error::Constraint {
        constraint: Some("account_identifiers_type_value_key".to_string()),
        detail: format!("identifier {identifier_type:?}:{value} is bound to another account"),
    })
}

pub async fn set_account_active(pool: &PgPool, id: Uuid, is_active: bool) -> Result<bool> {
    let result = sqlx::query("update accounts set is_active = $2, updated_at = now() where id = $1")
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete an account. Cascades to identifiers, characters, and sessions;
/// vehicles, inventories, and bans survive with their reference cleared.
pub async fn delete_account(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("delete from accounts where id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Ensure a (pending) whitelist entry exists for the account.
pub async fn upsert_whitelist(pool: &PgPool, account_id: Uuid) -> Result<WhitelistEntry> {
    let entry = sqlx::query_as::<_, WhitelistEntry>(
        r#"
        insert into whitelists (account_id)
        values ($1)
        on conflict (account_id) do update set updated_at = now()
        returning *
        "#,
    )
    .bind(account_id)
    .fetch_one(pool)
    .await?;
    Ok(entry)
}

pub async fn review_whitelist(
    pool: &PgPool,
    account_id: Uuid,
    status: WhitelistStatus,
    reviewer_account_id: Uuid,
    reason: Option<&str>,
) -> Result<Option<WhitelistEntry>> {
    let entry = sqlx::query_as::<_, WhitelistEntry>(
        r#"
        update whitelists
        set status = $2, reviewer_account_id = $3, reason = $4, updated_at = now()
        where account_id = $1
        returning *
        "#,
    )
    .bind(account_id)
    .bind(status)
    .bind(reviewer_account_id)
    .bind(reason)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

pub async fn issue_account_ban(
    pool: &PgPool,
    account_id: Uuid,
    issued_by: Option<Uuid>,
    reason: Option<&str>,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<Ban> {
    let ban = sqlx::query_as::<_, Ban>(
        r#"
        insert into bans (account_id, issued_by_account_id, reason, expires_at)
        values ($1, $2, $3, $4)
        returning *
        "#,
    )
    .bind(account_id)
    .bind(issued_by)
    .bind(reason)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;
    Ok(ban)
}

/// Ban a raw identifier, for accounts not (yet) known to the server.
pub async fn issue_identifier_ban(
    pool: &PgPool,
    identifier_type: IdentifierType,
    value: &str,
    issued_by: Option<Uuid>,
    reason: Option<&str>,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<Ban> {
    let ban = sqlx::query_as::<_, Ban>(
        r#"
        insert into bans (identifier_type, identifier_value, issued_by_account_id, reason, expires_at)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(identifier_type)
    .bind(value)
    .bind(issued_by)
    .bind(reason)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;
    Ok(ban)
}

pub async fn revoke_ban(pool: &PgPool, ban_id: Uuid, revoked_by: Uuid) -> Result<Option<Ban>> {
    let ban = sqlx::query_as::<_, Ban>(
        r#"
        update bans
        set revoked_at = now(), revoked_by_account_id = $2
        where id = $1 and revoked_at is null
        returning *
        "#,
    )
    .bind(ban_id)
    .bind(revoked_by)
    .fetch_optional(pool)
    .await?;
    Ok(ban)
}

pub async fn active_bans_for_account(pool: &PgPool, account_id: Uuid) -> Result<Vec<Ban>> {
    let bans = sqlx::query_as::<_, Ban>(
        r#"
        select * from bans
        where account_id = $1
          and revoked_at is null
          and (expires_at is null or expires_at > now())
        order by issued_at desc
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(bans)
}

pub async fn active_bans_for_identifier(
    pool: &PgPool,
    identifier_type: IdentifierType,
    value: &str,
) -> Result<Vec<Ban>> {
    let bans = sqlx::query_as::<_, Ban>(
        r#"
        select * from bans
        where identifier_type = $1 and identifier_value = $2
          and revoked_at is null
          and (expires_at is null or expires_at > now())
        order by issued_at desc
        "#,
    )
    .bind(identifier_type)
    .bind(value)
    .fetch_all(pool)
    .await?;
    Ok(bans)
}
