use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::Entity;
use crate::enums::CurrencyType;

/// One signed monetary movement in the append-only ledger.
///
/// Rows are never updated or deleted (the schema installs guard triggers);
/// balances are derived by summation. A movement can name an acting account
/// and a source and/or target party, each either a character or a business.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub currency: CurrencyType,
    /// Moved from the source party to the target party.
    pub amount: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub actor_account_id: Option<Uuid>,
    pub source_character_id: Option<Uuid>,
    pub source_business_id: Option<Uuid>,
    pub target_character_id: Option<Uuid>,
    pub target_business_id: Option<Uuid>,
    pub meta: Value,
}

impl Entity for LedgerEntry {
    const TABLE: &'static str = "economy_ledger";
}
