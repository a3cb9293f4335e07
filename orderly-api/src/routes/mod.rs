/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User accounts, login and password reset
/// - `items`: Catalog items
/// - `orders`: Orders with their user and item
/// - `company`: Merchant company onboarding records

pub mod company;
pub mod health;
pub mod items;
pub mod orders;
pub mod users;

use crate::error::{ApiError, ApiResult};
use serde::Serialize;
use uuid::Uuid;

/// Parses a path id, failing with 400 `Invalid <entity> ID`
pub fn parse_id(entity: &str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", entity)))
}

/// Body of every create response
#[derive(Debug, Serialize)]
pub struct Created<T: Serialize> {
    pub message: String,

    #[serde(flatten)]
    pub record: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("item", &id.to_string()).unwrap(), id);

        let err = parse_id("item", "42").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid item ID"));
        assert_eq!(err.status().as_u16(), 400);
    }
}
