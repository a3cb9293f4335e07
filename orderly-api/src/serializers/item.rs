//! Item response view

use chrono::{DateTime, Utc};
use orderly_shared::models::item::Item;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Item as returned to clients
///
/// `unit_price` serializes as a decimal string such as `"19.99"`.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub status: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            status: item.status.clone(),
            category: item.category.clone(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
