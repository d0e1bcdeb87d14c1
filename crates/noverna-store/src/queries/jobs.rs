//! Job and employment operations.

use sqlx::PgPool;
use uuid::Uuid;

use noverna_core::{CharacterJob, Job, JobGrade};

use crate::error::{Error, Result};

pub async fn create_job(pool: &PgPool, name: &str, label: &str, whitelisted: bool) -> Result<Job> {
    let job = sqlx::query_as::<_, Job>(
        "insert into jobs (name, label, whitelisted) values ($1, $2, $3) returning *",
    )
    .bind(name)
    .bind(label)
    .bind(whitelisted)
    .fetch_one(pool)
    .await?;
    Ok(job)
}

pub async fn create_job_grade(
    pool: &PgPool,
    job_id: Uuid,
    name: &str,
    label: &str,
    grade: i16,
    salary: i64,
) -> Result<JobGrade> {
    let grade = sqlx::query_as::<_, JobGrade>(
        r#"
        insert into job_grades (job_id, name, label, grade, salary)
        values ($1, $2, $3, $4, $5)
        returning *
        "#,
    )
    .bind(job_id)
    .bind(name)
    .bind(label)
    .bind(grade)
    .bind(salary)
    .fetch_one(pool)
    .await?;
    Ok(grade)
}

/// Assign (or re-grade) a character's job.
///
/// The grade must belong to the job; that is validated here before the write
/// so callers get a readable error, and enforced again by the composite
/// foreign key for writers that bypass this function.
pub async fn assign_job(
    pool: &PgPool,
    character_id: Uuid,
    job_id: Uuid,
    job_grade_id: Uuid,
    is_primary: bool,
) -> Result<CharacterJob> {
    ensure_grade_belongs_to_job(pool, job_id, job_grade_id).await?;

    let assignment = sqlx::query_as::<_, CharacterJob>(
        r#"
        insert into character_jobs (character_id, job_id, job_grade_id, is_primary)
        values ($1, $2, $3, $4)
        on conflict (character_id, job_id) do update set
          job_grade_id = excluded.job_grade_id,
          is_primary = excluded.is_primary,
          assigned_at = now()
        returning *
        "#,
    )
    .bind(character_id)
    .bind(job_id)
    .bind(job_grade_id)
    .bind(is_primary)
    .fetch_one(pool)
    .await?;
    Ok(assignment)
}

pub async fn set_duty(
    pool: &PgPool,
    character_id: Uuid,
    job_id: Uuid,
    on_duty: bool,
) -> Result<bool> {
    let result = sqlx::query(
        "update character_jobs set on_duty = $3 where character_id = $1 and job_id = $2",
    )
    .bind(character_id)
    .bind(job_id)
    .bind(on_duty)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove an employment record, unblocking deletion of the job or grade.
pub async fn remove_job(pool: &PgPool, character_id: Uuid, job_id: Uuid) -> Result<bool> {
    let result = sqlx::query("delete from character_jobs where character_id = $1 and job_id = $2")
        .bind(character_id)
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn ensure_grade_belongs_to_job(pool: &PgPool, job_id: Uuid, job_grade_id: Uuid) -> Result<()> {
    let owner: Option<Uuid> = sqlx::query_scalar("select job_id from job_grades where id = $1")
        .bind(job_grade_id)
        .fetch_optional(pool)
        .await?;
    match owner {
        Some(owner) if owner == job_id => Ok(()),
        Some(_) => Err(Error::Invalid(noverna_core::Error::InvalidReference(
            format!("grade {job_grade_id} does not belong to job {job_id}"),
        ))),
        None => Err(Error::Invalid(noverna_core::Error::InvalidReference(
            format!("grade {job_grade_id} does not exist"),
        ))),
    }
}
