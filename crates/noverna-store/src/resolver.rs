//! Execution of named relations from the core registry.
//!
//! Table and column names in the generated statements come exclusively from
//! the `'static` registry data, never from callers; the only caller-supplied
//! value is the bound key.

use sqlx::postgres::Postgres;
use sqlx::PgPool;

use noverna_core::relations::{Cardinality, RelationDef};
use noverna_core::{Entity, relation};

use crate::error::{Error, Result};

/// Key types bindable as the join value of a relation (`Uuid` everywhere
/// except the permission-name edges, which join on text).
pub trait RelationKey: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send {}

impl<K> RelationKey for K where K: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send {}

/// Fetch the rows of a to-many relation for the given source-column value.
pub async fn fetch_related<T, K>(pool: &PgPool, name: &str, key: K) -> Result<Vec<T>>
where
    T: Entity,
    K: RelationKey,
{
    let rel = relation(name)?;
    check_target::<T>(rel, Cardinality::Many)?;

    let sql = format!(
        "select * from {} where {} = $1",
        rel.target_table, rel.target_column
    );
    let rows = sqlx::query_as::<_, T>(&sql).bind(key).fetch_all(pool).await?;
    Ok(rows)
}

/// Fetch the row of a to-one relation, or `None` when absent.
pub async fn fetch_related_one<T, K>(pool: &PgPool, name: &str, key: K) -> Result<Option<T>>
where
    T: Entity,
    K: RelationKey,
{
    let rel = relation(name)?;
    check_target::<T>(rel, Cardinality::One)?;

    let sql = format!(
        "select * from {} where {} = $1",
        rel.target_table, rel.target_column
    );
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The declared cardinality and target entity are authoritative; a call
/// shape that disagrees is rejected before any statement runs.
fn check_target<T: Entity>(rel: &RelationDef, expected: Cardinality) -> Result<()> {
    if rel.target_table != T::TABLE {
        return Err(Error::Invalid(noverna_core::Error::RelationMismatch(
            format!(
                "relation {} targets {}, not {}",
                rel.name,
                rel.target_table,
                T::TABLE
            ),
        )));
    }
    if rel.cardinality != expected {
        return Err(Error::Invalid(noverna_core::Error::RelationMismatch(
            format!(
                "relation {} is declared {:?}, resolved as {:?}",
                rel.name, rel.cardinality, expected
            ),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use noverna_core::{Account, Character};

    use super::*;

    #[test]
    fn target_entity_must_match() {
        let rel = relation("account.characters").unwrap();
        assert!(check_target::<Character>(rel, Cardinality::Many).is_ok());
        assert!(check_target::<Account>(rel, Cardinality::Many).is_err());
    }

    #[test]
    fn cardinality_is_never_inferred() {
        let rel = relation("account.characters").unwrap();
        // A to-many relation cannot be resolved through the to-one shape.
        assert!(check_target::<Character>(rel, Cardinality::One).is_err());

        let rel = relation("character.account").unwrap();
        assert!(check_target::<Account>(rel, Cardinality::One).is_ok());
        assert!(check_target::<Account>(rel, Cardinality::Many).is_err());
    }
}
