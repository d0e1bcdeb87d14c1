//! Telephony operations: lines, contacts, messages, calls.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{PhoneCall, PhoneCallStatus, PhoneContact, PhoneMessage, PhoneNumber};

use crate::error::Result;

/// Assign a number to a character. A taken number surfaces as a constraint
/// conflict.
pub async fn claim_number(
    pool: &PgPool,
    number: &str,
    character_id: Uuid,
    is_primary: bool,
) -> Result<PhoneNumber> {
    let line = sqlx::query_as::<_, PhoneNumber>(
        r#"
        insert into phone_numbers (number, character_id, is_primary)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(number)
    .bind(character_id)
    .bind(is_primary)
    .fetch_one(pool)
    .await?;
    Ok(line)
}

pub async fn release_number(pool: &PgPool, number_id: Uuid) -> Result<Option<PhoneNumber>> {
    let line = sqlx::query_as::<_, PhoneNumber>(
        "update phone_numbers set character_id = null, is_primary = false, active = false \
         where id = $1 returning *",
    )
    .bind(number_id)
    .fetch_optional(pool)
    .await?;
    Ok(line)
}

pub async fn fetch_number(pool: &PgPool, number: &str) -> Result<Option<PhoneNumber>> {
    let line = sqlx::query_as::<_, PhoneNumber>("select * from phone_numbers where number = $1")
        .bind(number)
        .fetch_optional(pool)
        .await?;
    Ok(line)
}

/// Save a contact on a line; one entry per (line, number), name updates in
/// place.
pub async fn upsert_contact(
    pool: &PgPool,
    owner_number_id: Uuid,
    name: &str,
    number: &str,
) -> Result<PhoneContact> {
    let contact = sqlx::query_as::<_, PhoneContact>(
        r#"
        insert into phone_contacts (owner_number_id, name, number)
        values ($1, $2, $3)
        on conflict (owner_number_id, number) do update set name = excluded.name
        returning *
        "#,
    )
    .bind(owner_number_id)
    .bind(name)
    .bind(number)
    .fetch_one(pool)
    .await?;
    Ok(contact)
}

pub async fn delete_contact(pool: &PgPool, owner_number_id: Uuid, number: &str) -> Result<bool> {
    let result =
        sqlx::query("delete from phone_contacts where owner_number_id = $1 and number = $2")
            .bind(owner_number_id)
            .bind(number)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn send_message(
    pool: &PgPool,
    from_number_id: Uuid,
    to_number_id: Uuid,
    content: &str,
    meta: &Value,
) -> Result<PhoneMessage> {
    let message = sqlx::query_as::<_, PhoneMessage>(
        r#"
        insert into phone_messages (from_number_id, to_number_id, content, meta)
        values ($1, $2, $3, $4)
        returning *
        "#,
    )
    .bind(from_number_id)
    .bind(to_number_id)
    .bind(content)
    .bind(meta)
    .fetch_one(pool)
    .await?;
    Ok(message)
}

/// Messages between two lines in either direction, oldest first.
pub async fn conversation(
    pool: &PgPool,
    number_id: Uuid,
    other_number_id: Uuid,
    limit: i64,
) -> Result<Vec<PhoneMessage>> {
    let messages = sqlx::query_as::<_, PhoneMessage>(
        r#"
        select * from phone_messages
        where (from_number_id = $1 and to_number_id = $2)
           or (from_number_id = $2 and to_number_id = $1)
        order by created_at
        limit $3
        "#,
    )
    .bind(number_id)
    .bind(other_number_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

/// Mark everything the line received from the other line as read.
pub async fn mark_conversation_read(
    pool: &PgPool,
    number_id: Uuid,
    other_number_id: Uuid,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        update phone_messages
        set read_at = now()
        where to_number_id = $1 and from_number_id = $2 and read_at is null
        "#,
    )
    .bind(number_id)
    .bind(other_number_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn record_call(
    pool: &PgPool,
    from_number_id: Uuid,
    to_number_id: Uuid,
    status: PhoneCallStatus,
    duration_sec: i32,
    meta: &Value,
) -> Result<PhoneCall> {
    let call = sqlx::query_as::<_, PhoneCall>(
        r#"
        insert into phone_calls
          (from_number_id, to_number_id, status, ended_at, duration_sec, meta)
        values ($1, $2, $3, case when $3 = 'completed'::phone_call_status then now() end, $4, $5)
        returning *
        "#,
    )
    .bind(from_number_id)
    .bind(to_number_id)
    .bind(status)
    .bind(duration_sec)
    .bind(meta)
    .fetch_one(pool)
    .await?;
    Ok(call)
}
