//! Order request validation and binding
//!
//! Binding an order also checks its references: the user and item must
//! exist, and the item's unit price supplies the total when the client
//! omits it. [`orderly_shared::models::order::Order::create`] repeats the
//! existence check under row locks, so a reference deleted in between is
//! still caught.

use orderly_shared::db::gateway::{self, Record};
use orderly_shared::models::item::Item;
use orderly_shared::models::order::{CreateOrder, OrderStatus, UpdateOrder};
use orderly_shared::models::user::User;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::{FieldCheck, MAX_MONEY};
use crate::error::{ApiError, ApiResult};
use crate::extract::Envelope;

const STATUSES: &[&str] = &["pending", "completed", "canceled"];

/// Body of `POST /orders/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: Option<String>,

    pub item_id: Option<String>,

    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: Option<i32>,

    /// Defaults to `quantity × item.unit_price`
    pub total_price: Option<Decimal>,

    /// Defaults to `pending`
    pub status: Option<String>,
}

impl Envelope for CreateOrderRequest {
    const KEYS: &'static [&'static str] = &["order", "Order"];
}

/// A structurally valid order whose references are not yet checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOrder {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub total_price: Option<Decimal>,
    pub status: OrderStatus,
}

impl CreateOrderRequest {
    /// Field-level checks only
    pub fn check(&self) -> ApiResult<CheckedOrder> {
        let mut check = FieldCheck::of(self);
        check.require("user_id", &self.user_id);
        check.require("item_id", &self.item_id);
        check.require("quantity", &self.quantity);
        let user_id = check.uuid("user_id", self.user_id.as_deref());
        let item_id = check.uuid("item_id", self.item_id.as_deref());
        check.money("total_price", self.total_price);
        let status = check.one_of("status", self.status.as_deref(), OrderStatus::from_str, STATUSES);
        check.finish()?;

        match (user_id, item_id, self.quantity) {
            (Some(user_id), Some(item_id), Some(quantity)) => Ok(CheckedOrder {
                user_id,
                item_id,
                quantity,
                total_price: self.total_price,
                status: status.unwrap_or_default(),
            }),
            _ => Err(ApiError::Internal(
                "order fields passed validation but are missing".to_string(),
            )),
        }
    }

    /// Validates fields, then checks the user and item exist
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` for field violations
    /// - `ApiError::ReferenceNotFound` if the user or item is missing
    pub async fn bind(self, pool: &PgPool) -> ApiResult<CreateOrder> {
        let checked = self.check()?;

        if !gateway::exists::<User, _>(pool, checked.user_id).await? {
            return Err(ApiError::ReferenceNotFound {
                entity: User::ENTITY,
                id: checked.user_id,
            });
        }

        let item = Item::find_by_id(pool, checked.item_id)
            .await?
            .ok_or(ApiError::ReferenceNotFound {
                entity: Item::ENTITY,
                id: checked.item_id,
            })?;

        checked.into_record(item.unit_price)
    }
}

impl CheckedOrder {
    /// Completes the record using the item's unit price for a missing total
    ///
    /// A computed total is held to the same bounds as a client-supplied one.
    pub fn into_record(self, unit_price: Decimal) -> ApiResult<CreateOrder> {
        let total_price = match self.total_price {
            Some(total) => total,
            None => {
                let computed = unit_price.checked_mul(Decimal::from(self.quantity));
                let mut check = FieldCheck::default();
                match computed {
                    Some(total) => check.money("total_price", Some(total)),
                    None => check.add("total_price", format!("must not exceed {}", MAX_MONEY)),
                }
                check.finish()?;
                computed.unwrap_or_default()
            }
        };

        Ok(CreateOrder {
            user_id: self.user_id,
            item_id: self.item_id,
            quantity: self.quantity,
            total_price,
            status: self.status,
        })
    }
}

/// Body of `PUT /orders/update/:id`
///
/// The user and item of an order are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: Option<i32>,

    pub total_price: Option<Decimal>,

    pub status: Option<String>,
}

impl Envelope for UpdateOrderRequest {
    const KEYS: &'static [&'static str] = &["order", "Order"];
}

impl UpdateOrderRequest {
    pub fn bind(self) -> ApiResult<UpdateOrder> {
        let mut check = FieldCheck::of(&self);
        check.money("total_price", self.total_price);
        let status = check.one_of("status", self.status.as_deref(), OrderStatus::from_str, STATUSES);
        check.finish()?;

        Ok(UpdateOrder {
            quantity: self.quantity,
            total_price: self.total_price,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::from_json_bytes;

    #[test]
    fn test_check_valid_order() {
        let user_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let body = format!(
            r#"{{"order": {{"user_id": "{}", "item_id": "{}", "quantity": 3}}}}"#,
            user_id, item_id
        );
        let request: CreateOrderRequest = from_json_bytes(body.as_bytes()).unwrap();
        let checked = request.check().unwrap();

        assert_eq!(checked.user_id, user_id);
        assert_eq!(checked.item_id, item_id);
        assert_eq!(checked.status, OrderStatus::Pending);
        assert!(checked.total_price.is_none());
    }

    #[test]
    fn test_total_defaults_to_quantity_times_price() {
        let checked = CheckedOrder {
            user_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity: 3,
            total_price: None,
            status: OrderStatus::Pending,
        };

        let record = checked.clone().into_record(Decimal::new(1999, 2)).unwrap();
        assert_eq!(record.total_price, Decimal::new(5997, 2));

        let explicit = CheckedOrder {
            total_price: Some(Decimal::new(50, 0)),
            ..checked
        };
        assert_eq!(
            explicit.into_record(Decimal::new(1999, 2)).unwrap().total_price,
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn test_computed_total_must_fit_column() {
        let checked = CheckedOrder {
            user_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity: 100_000,
            total_price: None,
            status: OrderStatus::Pending,
        };

        let Err(ApiError::Validation(errors)) = checked.into_record(Decimal::new(999_999_999, 2)) else {
            panic!("expected validation error");
        };
        assert_eq!(errors["total_price"], "must not exceed 9999999999.99");
    }

    #[test]
    fn test_total_price_rules() {
        let request: UpdateOrderRequest = from_json_bytes(br#"{"total_price": "10.001"}"#).unwrap();
        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["total_price"], "must have at most 2 decimal places");
    }

    #[test]
    fn test_check_violations() {
        let request: CreateOrderRequest = from_json_bytes(
            br#"{"user_id": "nope", "quantity": 0, "total_price": -5, "status": "shipped"}"#,
        )
        .unwrap();

        let Err(ApiError::Validation(errors)) = request.check() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["user_id"], "must be a valid UUID");
        assert_eq!(errors["item_id"], "is required");
        assert_eq!(errors["quantity"], "must be at least 1");
        assert_eq!(errors["total_price"], "must not be negative");
        assert!(errors["status"].contains("pending"));
    }

    #[test]
    fn test_update_status_only() {
        let request: UpdateOrderRequest = from_json_bytes(br#"{"status": "completed"}"#).unwrap();
        let patch = request.bind().unwrap();

        assert_eq!(patch.status, Some(OrderStatus::Completed));
        assert!(patch.quantity.is_none());
        assert!(patch.total_price.is_none());
    }

    #[test]
    fn test_update_rejects_zero_quantity() {
        let request: UpdateOrderRequest = from_json_bytes(br#"{"quantity": 0}"#).unwrap();
        assert!(matches!(request.bind(), Err(ApiError::Validation(_))));
    }
}
