//! Database models for the back office
//!
//! Each model is a `sqlx::FromRow` record plus the column-specific queries
//! that create, read, patch and delete it.
//!
//! # Models
//!
//! - `user`: back-office accounts and login identity
//! - `company`: merchant onboarding records
//! - `item`: catalogue entries with a unit price
//! - `order`: a quantity of one item placed by one user
//!
//! # Example
//!
//! ```no_run
//! use orderly_shared::db::pool::{create_pool, DatabaseConfig};
//! use orderly_shared::models::item::{CreateItem, Item, ItemStatus};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig::default()).await?;
//!
//! let item = Item::create(
//!     &pool,
//!     CreateItem {
//!         name: "Widget".to_string(),
//!         unit: "piece".to_string(),
//!         unit_price: Decimal::new(250, 2),
//!         status: ItemStatus::Available,
//!         category: "hardware".to_string(),
//!     },
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

pub mod company;
pub mod item;
pub mod order;
pub mod user;

/// Pagination for list queries
///
/// Missing values fall back to the defaults; out-of-range values are clamped
/// rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Effective row limit, in `1..=MAX_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Effective offset, never negative
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_list_params_clamped() {
        let params = ListParams {
            limit: Some(50_000),
            offset: Some(-3),
        };
        assert_eq!(params.limit(), ListParams::MAX_LIMIT);
        assert_eq!(params.offset(), 0);

        let params = ListParams {
            limit: Some(0),
            offset: Some(20),
        };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 20);
    }
}
