//! Role-based access control operations.

use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{Permission, Role, RoleAssignment, RolePermission};

use crate::error::Result;

pub async fn create_role(pool: &PgPool, name: &str, description: Option<&str>) -> Result<Role> {
    let role = sqlx::query_as::<_, Role>(
        "insert into roles (name, description) values ($1, $2) returning *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(role)
}

/// Register a permission name in the closed vocabulary. Re-defining an
/// existing permission updates its description.
pub async fn define_permission(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Permission> {
    let permission = sqlx::query_as::<_, Permission>(
        r#"
        insert into permissions (name, description)
        values ($1, $2)
        on conflict (name) do update set description = excluded.description
        returning *
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(permission)
}

/// Assign a role to an account. A duplicate assignment surfaces as a
/// constraint conflict.
pub async fn assign_role(
    pool: &PgPool,
    account_id: Uuid,
    role_id: Uuid,
    assigned_by: Option<Uuid>,
) -> Result<RoleAssignment> {
    let assignment = sqlx::query_as::<_, RoleAssignment>(
        r#"
        insert into role_assignments (account_id, role_id, assigned_by_account_id)
        values ($1, $2, $3)
        returning *
        "#,
    )
    .bind(account_id)
    .bind(role_id)
    .bind(assigned_by)
    .fetch_one(pool)
    .await?;
    Ok(assignment)
}

pub async fn unassign_role(pool: &PgPool, account_id: Uuid, role_id: Uuid) -> Result<bool> {
    let result = sqlx::query("delete from role_assignments where account_id = $1 and role_id = $2")
        .bind(account_id)
        .bind(role_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn grant_permission(
    pool: &PgPool,
    role_id: Uuid,
    permission_name: &str,
) -> Result<RolePermission> {
    let grant = sqlx::query_as::<_, RolePermission>(
        r#"
        insert into role_permissions (role_id, permission_name)
        values ($1, $2)
        returning *
        "#,
    )
    .bind(role_id)
    .bind(permission_name)
    .fetch_one(pool)
    .await?;
    Ok(grant)
}

/// All permission names the account holds through its role assignments.
pub async fn effective_permissions(pool: &PgPool, account_id: Uuid) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        select distinct rp.permission_name
        from role_permissions rp
        join role_assignments ra on ra.role_id = rp.role_id
        where ra.account_id = $1
        order by rp.permission_name
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}
