use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;

/// Connection-lifetime tracking for one account.
///
/// At most one open session (null `ended_at`) exists per account; the schema
/// enforces it with a partial unique index and the sessions façade closes
/// stale open sessions before opening a new one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaySession {
    pub id: Uuid,
    pub account_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub last_seen_at: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub ended_reason: Option<String>,
    pub meta: Value,
}

impl Entity for PlaySession {
    const TABLE: &'static str = "play_sessions";
}
