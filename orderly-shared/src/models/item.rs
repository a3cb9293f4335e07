//! Item model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE items (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     unit VARCHAR(64) NOT NULL,
//!     unit_price NUMERIC(12, 2) NOT NULL,
//!     status VARCHAR(20) NOT NULL DEFAULT 'available',
//!     category VARCHAR(64) NOT NULL DEFAULT 'any',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     CONSTRAINT items_unit_price_check CHECK (unit_price >= 0),
//!     CONSTRAINT items_status_check CHECK (
//!         status IN ('available', 'out_of_stock', 'discontinued')
//!     )
//! );
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::ListParams;
use crate::db::gateway::{self, Record};
use crate::error::{StoreError, StoreResult};

const COLUMNS: &str = "id, name, unit, unit_price, status, category, created_at, updated_at";

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "any";

/// Availability of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Can be ordered
    #[default]
    Available,

    /// Temporarily unavailable
    OutOfStock,

    /// No longer sold
    Discontinued,
}

impl ItemStatus {
    /// All accepted values, in declaration order
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Available,
        ItemStatus::OutOfStock,
        ItemStatus::Discontinued,
    ];

    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::OutOfStock => "out_of_stock",
            ItemStatus::Discontinued => "discontinued",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(ItemStatus::Available),
            "out_of_stock" => Some(ItemStatus::OutOfStock),
            "discontinued" => Some(ItemStatus::Discontinued),
            _ => None,
        }
    }
}

/// Catalogue item
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Item {
    /// Unique item ID
    pub id: Uuid,

    /// Display name; also used as the merchant filter key
    pub name: String,

    /// Unit of sale, e.g. "kg" or "piece"
    pub unit: String,

    /// Price per unit, never negative
    pub unit_price: Decimal,

    /// One of [`ItemStatus`], stored as text
    pub status: String,

    /// Free-form category
    pub category: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Gets the parsed status enum
    pub fn get_status(&self) -> Option<ItemStatus> {
        ItemStatus::from_str(&self.status)
    }
}

impl Record for Item {
    const TABLE: &'static str = "items";
    const ENTITY: &'static str = "item";
}

/// Input for creating a new item
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub status: ItemStatus,
    pub category: String,
}

/// Partial update for an item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub status: Option<ItemStatus>,
    pub category: Option<String>,
}

impl UpdateItem {
    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filter for [`Item::find_by`]
///
/// Every `Some` field must match exactly; an empty filter matches all items.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub name: Option<String>,
}

impl Item {
    /// Inserts a new item
    pub async fn create(pool: &PgPool, data: CreateItem) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO items (name, unit, unit_price, status, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(data.name)
            .bind(data.unit)
            .bind(data.unit_price)
            .bind(data.status.as_str())
            .bind(data.category)
            .fetch_one(pool)
            .await
    }

    /// Finds an item by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");

        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads an item by ID, failing with [`StoreError::NotFound`] if absent
    pub async fn get(pool: &PgPool, id: Uuid) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    /// Loads every item whose id is in `ids`
    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COLUMNS} FROM items WHERE id = ANY($1)");

        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Lists items, oldest first
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_by(pool, &ItemFilter::default(), params).await
    }

    /// Lists items matching `filter`, oldest first
    pub async fn find_by(
        pool: &PgPool,
        filter: &ItemFilter,
        params: ListParams,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM items WHERE TRUE"));

        if let Some(category) = &filter.category {
            builder.push(" AND category = ").push_bind(category);
        }

        if let Some(name) = &filter.name {
            builder.push(" AND name = ").push_bind(name);
        }

        builder
            .push(" ORDER BY created_at, id LIMIT ")
            .push_bind(params.limit())
            .push(" OFFSET ")
            .push_bind(params.offset());

        builder.build_query_as::<Item>().fetch_all(pool).await
    }

    /// Applies a patch
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the item does not exist
    /// - [`StoreError::NoRowsAffected`] if the patch is empty or changes nothing
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateItem) -> StoreResult<Self> {
        if data.is_empty() {
            return Err(gateway::classify_missed_update::<Self>(pool, id).await);
        }

        let query = format!(
            r#"
            UPDATE items SET
                name = COALESCE($2, name),
                unit = COALESCE($3, unit),
                unit_price = COALESCE($4, unit_price),
                status = COALESCE($5, status),
                category = COALESCE($6, category),
                updated_at = NOW()
            WHERE id = $1
              AND (name, unit, unit_price, status, category)
                  IS DISTINCT FROM
                  (COALESCE($2, name), COALESCE($3, unit), COALESCE($4, unit_price),
                   COALESCE($5, status), COALESCE($6, category))
            RETURNING {COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.unit)
            .bind(data.unit_price)
            .bind(data.status.map(|s| s.as_str()))
            .bind(data.category)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(item) => Ok(item),
            None => Err(gateway::classify_missed_update::<Self>(pool, id).await),
        }
    }

    /// Permanently deletes an item
    ///
    /// Orders referencing the item are kept; their item view becomes null.
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<()> {
        gateway::delete::<Self>(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_conversion() {
        for status in ItemStatus::ALL {
            assert_eq!(ItemStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ItemStatus::from_str("sold"), None);
        assert_eq!(ItemStatus::from_str("Available"), None);
    }

    #[test]
    fn test_item_status_default() {
        assert_eq!(ItemStatus::default(), ItemStatus::Available);
    }

    #[test]
    fn test_item_status_serde_matches_storage() {
        let json = serde_json::to_string(&ItemStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
    }

    #[test]
    fn test_update_item_is_empty() {
        assert!(UpdateItem::default().is_empty());
        assert!(!UpdateItem {
            unit_price: Some(Decimal::ZERO),
            ..Default::default()
        }
        .is_empty());
    }
}
