//! Entity-generic persistence primitives
//!
//! Each model implements [`Record`] to name its table. The primitives here
//! cover the operations whose SQL does not depend on the columns: existence
//! checks and delete-by-id. Column-specific create/read/update live on the
//! model types themselves.

use crate::error::{StoreError, StoreResult};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// A persisted entity with a UUID primary key
pub trait Record {
    /// Table name in the database
    const TABLE: &'static str;

    /// Human-readable entity name used in error messages
    const ENTITY: &'static str;
}

/// Whether a row with `id` exists in the entity's table
pub async fn exists<'e, R, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    R: Record,
    E: PgExecutor<'e>,
{
    let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", R::TABLE);

    sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(executor)
        .await
}

/// Deletes the row with `id`
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if no row was deleted.
pub async fn delete<R: Record>(pool: &PgPool, id: Uuid) -> StoreResult<()> {
    let query = format!("DELETE FROM {} WHERE id = $1", R::TABLE);

    let result = sqlx::query(&query).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound {
            entity: R::ENTITY,
            id,
        });
    }

    tracing::debug!(entity = R::ENTITY, %id, "Row deleted");
    Ok(())
}

/// Turns the empty result of a conditional `UPDATE ... RETURNING` into the
/// right error
///
/// A patch `UPDATE` only matches when at least one supplied column differs
/// from its stored value, so "no row returned" means either the row is gone
/// or the patch was a no-op.
pub async fn classify_missed_update<R: Record>(pool: &PgPool, id: Uuid) -> StoreError {
    match exists::<R, _>(pool, id).await {
        Ok(true) => StoreError::NoRowsAffected {
            entity: R::ENTITY,
            id,
        },
        Ok(false) => StoreError::NotFound {
            entity: R::ENTITY,
            id,
        },
        Err(e) => StoreError::Database(e),
    }
}
