use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    /// Internal name, e.g. "police".
    pub name: String,
    pub label: String,
    pub whitelisted: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Job {
    const TABLE: &'static str = "jobs";
}

/// A rank within a job; the grade number is unique per job.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobGrade {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub label: String,
    pub grade: i16,
    pub salary: i64,
}

impl Entity for JobGrade {
    const TABLE: &'static str = "job_grades";
}

/// Employment record; one per (character, job).
///
/// `job_grade_id` must reference a grade belonging to `job_id`. The schema
/// enforces this with a composite foreign key, and the jobs façade validates
/// it before writing so callers see a readable error instead of a raw
/// constraint violation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CharacterJob {
    pub id: Uuid,
    pub character_id: Uuid,
    pub job_id: Uuid,
    pub job_grade_id: Uuid,
    pub is_primary: bool,
    pub on_duty: bool,
    pub assigned_at: DateTime<Utc>,
}

impl Entity for CharacterJob {
    const TABLE: &'static str = "character_jobs";
}
