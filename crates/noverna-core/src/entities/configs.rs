use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;

/// A namespaced key/value setting; unique per (namespace, key).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConfigEntry {
    pub id: Uuid,
    pub namespace: String,
    pub key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

impl Entity for ConfigEntry {
    const TABLE: &'static str = "configs";
}
