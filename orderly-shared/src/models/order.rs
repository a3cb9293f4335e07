//! Order model and database operations
//!
//! An order points at one user and one item by id. The schema has no foreign
//! keys, so [`Order::create`] checks both references inside the insert
//! transaction, and readers must cope with a reference that has since been
//! deleted.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE orders (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL,
//!     item_id UUID NOT NULL,
//!     quantity INTEGER NOT NULL,
//!     total_price NUMERIC(12, 2) NOT NULL,
//!     status VARCHAR(20) NOT NULL DEFAULT 'pending',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::item::Item;
use super::user::User;
use super::ListParams;
use crate::db::gateway::{self, Record};
use crate::error::{StoreError, StoreResult};

const COLUMNS: &str = "id, user_id, item_id, quantity, total_price, status, created_at, updated_at";

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl OrderStatus {
    /// All accepted values, in declaration order
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Completed,
        OrderStatus::Canceled,
    ];

    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }
}

/// An order of `quantity` units of one item by one user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,

    /// Ordering user; may dangle after the user is deleted
    pub user_id: Uuid,

    /// Ordered item; may dangle after the item is deleted
    pub item_id: Uuid,

    /// Always at least 1
    pub quantity: i32,

    /// Never negative
    pub total_price: Decimal,

    /// One of [`OrderStatus`], stored as text
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Gets the parsed status enum
    pub fn get_status(&self) -> Option<OrderStatus> {
        OrderStatus::from_str(&self.status)
    }
}

impl Record for Order {
    const TABLE: &'static str = "orders";
    const ENTITY: &'static str = "order";
}

/// Input for creating a new order
///
/// `total_price` is final here; defaulting it from the item price happens
/// before this point.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: OrderStatus,
}

/// Partial update for an order
///
/// References cannot be changed; an order always belongs to the user and
/// item it was created with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOrder {
    pub quantity: Option<i32>,
    pub total_price: Option<Decimal>,
    pub status: Option<OrderStatus>,
}

impl UpdateOrder {
    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Order {
    /// Inserts a new order after re-checking both references
    ///
    /// The user and item rows are locked with `FOR KEY SHARE` for the
    /// duration of the transaction, so neither can be deleted between the
    /// check and the insert.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReferenceNotFound`] naming the first missing
    /// reference; nothing is written in that case.
    pub async fn create(pool: &PgPool, data: CreateOrder) -> StoreResult<Self> {
        let mut tx = pool.begin().await?;

        let user_locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR KEY SHARE")
                .bind(data.user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if user_locked.is_none() {
            return Err(StoreError::ReferenceNotFound {
                entity: User::ENTITY,
                id: data.user_id,
            });
        }

        let item_locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM items WHERE id = $1 FOR KEY SHARE")
                .bind(data.item_id)
                .fetch_optional(&mut *tx)
                .await?;

        if item_locked.is_none() {
            return Err(StoreError::ReferenceNotFound {
                entity: Item::ENTITY,
                id: data.item_id,
            });
        }

        let query = format!(
            r#"
            INSERT INTO orders (user_id, item_id, quantity, total_price, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, Order>(&query)
            .bind(data.user_id)
            .bind(data.item_id)
            .bind(data.quantity)
            .bind(data.total_price)
            .bind(data.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Finds an order by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");

        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads an order by ID, failing with [`StoreError::NotFound`] if absent
    pub async fn get(pool: &PgPool, id: Uuid) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    /// Lists orders, oldest first
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, Order>(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Counts every order
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
    }

    /// Applies a patch
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the order does not exist
    /// - [`StoreError::NoRowsAffected`] if the patch is empty or changes nothing
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateOrder) -> StoreResult<Self> {
        if data.is_empty() {
            return Err(gateway::classify_missed_update::<Self>(pool, id).await);
        }

        let query = format!(
            r#"
            UPDATE orders SET
                quantity = COALESCE($2, quantity),
                total_price = COALESCE($3, total_price),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
              AND (quantity, total_price, status)
                  IS DISTINCT FROM
                  (COALESCE($2, quantity), COALESCE($3, total_price), COALESCE($4, status))
            RETURNING {COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(data.quantity)
            .bind(data.total_price)
            .bind(data.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(order) => Ok(order),
            None => Err(gateway::classify_missed_update::<Self>(pool, id).await),
        }
    }

    /// Permanently deletes an order
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<()> {
        gateway::delete::<Self>(pool, id).await
    }
}

/// Users and items referenced by a batch of orders
///
/// Loaded with two `ANY($1)` queries regardless of how many orders there
/// are. Lookups return `None` for references that no longer exist.
#[derive(Debug, Default)]
pub struct OrderRelations {
    users: HashMap<Uuid, User>,
    items: HashMap<Uuid, Item>,
}

impl OrderRelations {
    /// Loads the relations of every order in `orders`
    pub async fn load(pool: &PgPool, orders: &[Order]) -> Result<Self, sqlx::Error> {
        let mut user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut item_ids: Vec<Uuid> = orders.iter().map(|o| o.item_id).collect();
        item_ids.sort_unstable();
        item_ids.dedup();

        let users = User::find_many(pool, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let items = Item::find_many(pool, &item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        Ok(Self { users, items })
    }

    /// Builds relations from already loaded records
    pub fn from_records(
        users: impl IntoIterator<Item = User>,
        items: impl IntoIterator<Item = Item>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_conversion() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("cancelled"), None);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_update_order_is_empty() {
        assert!(UpdateOrder::default().is_empty());
        assert!(!UpdateOrder {
            status: Some(OrderStatus::Completed),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_relations_missing_reference_is_none() {
        let relations = OrderRelations::default();
        assert!(relations.user(Uuid::new_v4()).is_none());
        assert!(relations.item(Uuid::new_v4()).is_none());
    }
}
