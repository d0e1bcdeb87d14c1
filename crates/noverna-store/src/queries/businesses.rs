//! Business and membership operations.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Business, BusinessMembership, BusinessRole};

use crate::error::{Error, Result};

pub async fn create_business(pool: &PgPool, name: &str, label: &str) -> Result<Business> {
    let business = sqlx::query_as::<_, Business>(
        "insert into businesses (name, label) values ($1, $2) returning *",
    )
    .bind(name)
    .bind(label)
    .fetch_one(pool)
    .await?;
    Ok(business)
}

pub async fn create_business_role(
    pool: &PgPool,
    business_id: Uuid,
    name: &str,
    label: &str,
    rank: i16,
    permissions: &Value,
) -> Result<BusinessRole> {
    let role = sqlx::query_as::<_, BusinessRole>(
        r#"
        insert into business_roles (business_id, name, label, rank, permissions)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(business_id)
    .bind(name)
    .bind(label)
    .bind(rank)
    .bind(permissions)
    .fetch_one(pool)
    .await?;
    Ok(role)
}

/// Hire an account into a business. The role must belong to the same
/// business; validated here and enforced by the composite foreign key.
pub async fn hire_member(
    pool: &PgPool,
    business_id: Uuid,
    account_id: Uuid,
    role_id: Uuid,
    is_owner: bool,
) -> Result<BusinessMembership> {
    ensure_role_belongs_to_business(pool, business_id, role_id).await?;

    let membership = sqlx::query_as::<_, BusinessMembership>(
        r#"
        insert into business_memberships (business_id, account_id, role_id, is_owner)
        values ($1, $2, $3, $4)
        returning *
        "#,
    )
    .bind(business_id)
    .bind(account_id)
    .bind(role_id)
    .bind(is_owner)
    .fetch_one(pool)
    .await?;
    Ok(membership)
}

pub async fn change_member_role(
    pool: &PgPool,
    business_id: Uuid,
    account_id: Uuid,
    role_id: Uuid,
) -> Result<Option<BusinessMembership>> {
    ensure_role_belongs_to_business(pool, business_id, role_id).await?;

    let membership = sqlx::query_as::<_, BusinessMembership>(
        r#"
        update business_memberships
        set role_id = $3
        where business_id = $1 and account_id = $2
        returning *
        "#,
    )
    .bind(business_id)
    .bind(account_id)
    .bind(role_id)
    .fetch_optional(pool)
    .await?;
    Ok(membership)
}

pub async fn fire_member(pool: &PgPool, business_id: Uuid, account_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "delete from business_memberships where business_id = $1 and account_id = $2",
    )
    .bind(business_id)
    .bind(account_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn ensure_role_belongs_to_business(
    pool: &PgPool,
    business_id: Uuid,
    role_id: Uuid,
) -> Result<()> {
    let owner: Option<Uuid> = sqlx::query_scalar("select business_id from business_roles where id = $1")
        .bind(role_id)
        .fetch_optional(pool)
        .await?;
    match owner {
        Some(owner) if owner == business_id => Ok(()),
        Some(_) => Err(Error::Invalid(noverna_core::Error::InvalidReference(
            format!("role {role_id} does not belong to business {business_id}"),
        ))),
        None => Err(Error::Invalid(noverna_core::Error::InvalidReference(
            format!("role {role_id} does not exist"),
        ))),
    }
}
