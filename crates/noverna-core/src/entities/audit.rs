use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;

/// One append-only action record (e.g. "ban.create" against an account).
/// Like the economy ledger, rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_account_id: Option<Uuid>,
    pub action: String,
    /// E.g. "account", "character".
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub meta: Value,
}

impl Entity for AuditLog {
    const TABLE: &'static str = "audit_logs";
}
