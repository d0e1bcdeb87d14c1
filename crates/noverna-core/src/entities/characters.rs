use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::CharacterGender;

/// A playable persona owned by exactly one account.
///
/// `cash` and `bank` are a cache of ledger effect, maintained by the economy
/// façade in the same transaction as each posting; the ledger is the source
/// of truth. Soft-deleted rows stay behind for audit and are excluded from
/// the active query paths.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Character {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Human-friendly character code shown to users (e.g. "NOA-12345").
    pub cid: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: CharacterGender,
    /// Stored as YYYY-MM-DD text.
    pub date_of_birth: Option<String>,
    pub cash: i64,
    pub bank: i64,
    pub position: Value,
    pub metadata: Value,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Character {
    const TABLE: &'static str = "characters";
}

/// Visual customization, one-to-one with its character.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CharacterAppearance {
    pub id: Uuid,
    pub character_id: Uuid,
    pub ped_model: String,
    pub components: Value,
    pub overlays: Value,
    pub props: Value,
    pub updated_at: DateTime<Utc>,
}

impl Entity for CharacterAppearance {
    const TABLE: &'static str = "character_appearances";
}

/// Keyed transient or permanent state on a character, unique per key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CharacterFlag {
    pub id: Uuid,
    pub character_id: Uuid,
    pub key: String,
    pub value: Value,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for CharacterFlag {
    const TABLE: &'static str = "character_flags";
}
