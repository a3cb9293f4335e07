//! Item request validation and binding

use orderly_shared::models::item::{CreateItem, ItemStatus, UpdateItem, DEFAULT_CATEGORY};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::FieldCheck;
use crate::error::ApiResult;
use crate::extract::Envelope;

const STATUSES: &[&str] = &["available", "out_of_stock", "discontinued"];

/// Body of `POST /items/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub unit: String,

    pub unit_price: Option<Decimal>,

    /// Defaults to `available`
    pub status: Option<String>,

    /// Defaults to `any`
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

impl Envelope for CreateItemRequest {
    const KEYS: &'static [&'static str] = &["item", "Item"];
}

impl CreateItemRequest {
    pub fn bind(self) -> ApiResult<CreateItem> {
        let mut check = FieldCheck::of(&self);
        check.filled("name", &self.name);
        check.filled("unit", &self.unit);
        check.require("unit_price", &self.unit_price);
        check.money("unit_price", self.unit_price);
        let status = check.one_of("status", self.status.as_deref(), ItemStatus::from_str, STATUSES);
        check.finish()?;

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(CreateItem {
            name: self.name,
            unit: self.unit,
            unit_price: self.unit_price.unwrap_or_default(),
            status: status.unwrap_or_default(),
            category,
        })
    }
}

/// Body of `PUT /items/update/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub unit: Option<String>,

    pub unit_price: Option<Decimal>,

    pub status: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
}

impl Envelope for UpdateItemRequest {
    const KEYS: &'static [&'static str] = &["item", "Item"];
}

impl UpdateItemRequest {
    pub fn bind(self) -> ApiResult<UpdateItem> {
        let mut check = FieldCheck::of(&self);
        check.money("unit_price", self.unit_price);
        let status = check.one_of("status", self.status.as_deref(), ItemStatus::from_str, STATUSES);
        check.finish()?;

        Ok(UpdateItem {
            name: self.name,
            unit: self.unit,
            unit_price: self.unit_price,
            status,
            category: self.category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::extract::from_json_bytes;

    #[test]
    fn test_create_defaults() {
        let request: CreateItemRequest =
            from_json_bytes(br#"{"item": {"name": "Rice", "unit": "kg", "unit_price": 12.5}}"#).unwrap();
        let record = request.bind().unwrap();

        assert_eq!(record.status, ItemStatus::Available);
        assert_eq!(record.category, "any");
        assert_eq!(record.unit_price, Decimal::new(125, 1));
    }

    #[test]
    fn test_create_accepts_capitalized_envelope_and_string_price() {
        let request: CreateItemRequest = from_json_bytes(
            br#"{"Item": {"name": "Rice", "unit": "kg", "unit_price": "3.10", "status": "out_of_stock", "category": "grain"}}"#,
        )
        .unwrap();
        let record = request.bind().unwrap();

        assert_eq!(record.status, ItemStatus::OutOfStock);
        assert_eq!(record.category, "grain");
        assert_eq!(record.unit_price, Decimal::new(310, 2));
    }

    #[test]
    fn test_create_violations() {
        let request: CreateItemRequest =
            from_json_bytes(br#"{"name": "", "unit_price": -1, "status": "sold"}"#).unwrap();

        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["name"], "is required");
        assert_eq!(errors["unit"], "is required");
        assert_eq!(errors["unit_price"], "must not be negative");
        assert!(errors["status"].contains("available"));
    }

    #[test]
    fn test_create_missing_price() {
        let request: CreateItemRequest = from_json_bytes(br#"{"name": "Rice", "unit": "kg"}"#).unwrap();

        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["unit_price"], "is required");
    }

    #[test]
    fn test_update_only_present_fields() {
        let request: UpdateItemRequest = from_json_bytes(br#"{"status": "discontinued"}"#).unwrap();
        let patch = request.bind().unwrap();

        assert_eq!(patch.status, Some(ItemStatus::Discontinued));
        assert!(patch.name.is_none());
        assert!(patch.unit_price.is_none());
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let request: UpdateItemRequest = from_json_bytes(br#"{"name": ""}"#).unwrap();
        assert!(request.bind().is_err());
    }

    #[test]
    fn test_create_respects_column_widths() {
        let body = serde_json::json!({
            "name": "x".repeat(256),
            "unit": "u".repeat(65),
            "unit_price": "1.00",
            "category": "c".repeat(65),
        });
        let request: CreateItemRequest = from_json_bytes(body.to_string().as_bytes()).unwrap();

        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["name"], "must be at most 255 characters");
        assert_eq!(errors["unit"], "must be at most 64 characters");
        assert_eq!(errors["category"], "must be at most 64 characters");
    }

    #[test]
    fn test_price_must_fit_without_rounding() {
        let request: CreateItemRequest =
            from_json_bytes(br#"{"name": "Rice", "unit": "kg", "unit_price": "19.999"}"#).unwrap();
        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["unit_price"], "must have at most 2 decimal places");

        let request: UpdateItemRequest = from_json_bytes(br#"{"unit_price": "100000000000"}"#).unwrap();
        let Err(ApiError::Validation(errors)) = request.bind() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["unit_price"], "must not exceed 9999999999.99");
    }
}
