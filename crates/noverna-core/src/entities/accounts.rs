use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::{IdentifierType, WhitelistStatus};

/// A player's persistent identity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    /// Unique when present; accounts created from identifiers alone have none.
    pub email: Option<String>,
    /// Global flags / preferences. Auditable, not for secrets.
    pub flags: Value,
    pub is_active: bool,
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
}

/// A device/network identifier bound to an account. One account per
/// (type, value) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountIdentifier {
    pub id: Uuid,
    pub account_id: Uuid,
    pub r#type: IdentifierType,
    pub value: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub meta: Value,
}

impl Entity for AccountIdentifier {
    const TABLE: &'static str = "account_identifiers";
}

/// Access-approval state for an account. One entry per account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WhitelistEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub status: WhitelistStatus,
    pub reason: Option<String>,
    pub reviewer_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for WhitelistEntry {
    const TABLE: &'static str = "whitelists";
}

/// A block on an account or on a raw identifier (for offline bans).
///
/// Either `account_id` or the identifier pair may be set; a ban survives
/// deletion of the account it targeted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ban {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub identifier_type: Option<IdentifierType>,
    pub identifier_value: Option<String>,
    pub scope: String,
    pub reason: Option<String>,
    pub issued_by_account_id: Option<Uuid>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by_account_id: Option<Uuid>,
    pub meta: Value,
}

impl Ban {
    /// A ban is active while unrevoked and unexpired (no expiry = permanent).
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at.is_none_or(|at| at > now)
    }
}

impl Entity for Ban {
    const TABLE: &'static str = "bans";
}
