//! Economy ledger operations.
//!
//! The ledger is append-only: postings only ever insert. Character `cash`/
//! `bank` columns are a cache of ledger effect and are updated in the same
//! transaction as the posting they reflect; [`derived_balance`] reconstructs
//! a balance from the ledger alone.

use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use noverna_core::{CurrencyType, LedgerEntry};

use crate::error::Result;

/// A party on one side of a monetary movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerParty {
    Character(Uuid),
    Business(Uuid),
}

impl LedgerParty {
    fn into_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            LedgerParty::Character(id) => (Some(id), None),
            LedgerParty::Business(id) => (None, Some(id)),
        }
    }
}

/// A ledger posting: `amount` moves from `source` to `target`. Either side
/// may be absent (mint/sink postings such as paychecks or fines).
#[derive(Debug, Clone)]
pub struct Posting {
    pub currency: CurrencyType,
    pub amount: i64,
    pub reason: Option<String>,
    pub actor_account_id: Option<Uuid>,
    pub source: Option<LedgerParty>,
    pub target: Option<LedgerParty>,
    pub meta: Value,
}

/// Append one entry and apply its effect to the balance caches, atomically.
pub async fn post_entry(pool: &PgPool, posting: Posting) -> Result<LedgerEntry> {
    let mut tx = pool.begin().await?;

    let (source_character, source_business) = posting
        .source
        .map(LedgerParty::into_columns)
        .unwrap_or((None, None));
    let (target_character, target_business) = posting
        .target
        .map(LedgerParty::into_columns)
        .unwrap_or((None, None));

    let entry = sqlx::query_as::<_, LedgerEntry>(
        r#"
        insert into economy_ledger
          (currency, amount, reason, actor_account_id,
           source_character_id, source_business_id,
           target_character_id, target_business_id, meta)
        values ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        returning *
        "#,
    )
    .bind(posting.currency)
    .bind(posting.amount)
    .bind(posting.reason.as_deref())
    .bind(posting.actor_account_id)
    .bind(source_character)
    .bind(source_business)
    .bind(target_character)
    .bind(target_business)
    .bind(&posting.meta)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(source) = posting.source {
        apply_cache_delta(&mut tx, source, posting.currency, -posting.amount).await?;
    }
    if let Some(target) = posting.target {
        apply_cache_delta(&mut tx, target, posting.currency, posting.amount).await?;
    }

    tx.commit().await?;
    Ok(entry)
}

/// Reconstruct a character's balance in one currency from the ledger:
/// credits where the character is the target minus debits where it is the
/// source.
pub async fn derived_balance(
    pool: &PgPool,
    character_id: Uuid,
    currency: CurrencyType,
) -> Result<i64> {
    let balance = sqlx::query_scalar::<_, i64>(
        r#"
        select coalesce(sum(
          case
            when target_character_id = $1 then amount
            when source_character_id = $1 then -amount
            else 0
          end
        ), 0)::bigint
        from economy_ledger
        where currency = $2
          and (target_character_id = $1 or source_character_id = $1)
        "#,
    )
    .bind(character_id)
    .bind(currency)
    .fetch_one(pool)
    .await?;
    Ok(balance)
}

pub async fn recent_entries_for_character(
    pool: &PgPool,
    character_id: Uuid,
    limit: i64,
) -> Result<Vec<LedgerEntry>> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        r#"
        select * from economy_ledger
        where source_character_id = $1 or target_character_id = $1
        order by created_at desc
        limit $2
        "#,
    )
    .bind(character_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

async fn apply_cache_delta(
    tx: &mut Transaction<'_, Postgres>,
    party: LedgerParty,
    currency: CurrencyType,
    delta: i64,
) -> Result<()> {
    match party {
        LedgerParty::Character(id) => {
            let column = match currency {
                CurrencyType::Cash => "cash",
                CurrencyType::Bank => "bank",
            };
            let sql = format!(
                "update characters set {column} = {column} + $2, updated_at = now() where id = $1"
            );
            sqlx::query(&sql).bind(id).bind(delta).execute(&mut **tx).await?;
        }
        LedgerParty::Business(id) => {
            sqlx::query(
                "update businesses set bank_balance = bank_balance + $2, updated_at = now() \
                 where id = $1",
            )
            .bind(id)
            .bind(delta)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}
