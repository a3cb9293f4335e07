//! Order response view
//!
//! An order is returned with its user and item embedded. Either may be
//! `null` when the referenced record has since been deleted.

use chrono::{DateTime, Utc};
use orderly_shared::models::order::{Order, OrderRelations};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{ItemView, UserSummary};

/// Order with its user and item, one level deep
///
/// `user` and `item` are `null` when the referenced row has been deleted
/// since the order was placed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: String,
    pub user: Option<UserSummary>,
    pub item: Option<ItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    pub fn new(order: &Order, relations: &OrderRelations) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            item_id: order.item_id,
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status.clone(),
            user: relations.user(order.user_id).map(UserSummary::from),
            item: relations.item(order.item_id).map(ItemView::from),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// Views for `orders`, in the same order
    pub fn many(orders: &[Order], relations: &OrderRelations) -> Vec<Self> {
        orders.iter().map(|o| Self::new(o, relations)).collect()
    }
}
